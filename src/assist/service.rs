use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::notify::{NoticeKind, Notifier};
use crate::transcript::{ActionItemRow, RecordStore};

use super::gateway::{AssistantGateway, CompletionKind};

/// Voice command categories, classified by the AI service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandKind {
    CreateTask,
    ScheduleFollowup,
    Summarize,
}

/// A classified voice command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceCommand {
    #[serde(rename = "type")]
    pub kind: CommandKind,
    pub payload: String,
}

#[derive(Debug, Deserialize)]
struct TaskFields {
    title: String,
    #[serde(default, rename = "dueDate")]
    due_date: Option<String>,
    #[serde(default)]
    assignee: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptInsights {
    #[serde(default, rename = "actionItems")]
    action_items: Vec<String>,
}

/// Higher-level assistant operations built on the gateway contract.
///
/// Command classification itself is the AI service's job; this type only
/// parses the classifications and applies their side effects.
pub struct AssistantService {
    gateway: Arc<dyn AssistantGateway>,
    store: Arc<dyn RecordStore>,
    meeting_id: String,
    notifier: Arc<dyn Notifier>,
}

impl AssistantService {
    pub fn new(
        gateway: Arc<dyn AssistantGateway>,
        store: Arc<dyn RecordStore>,
        meeting_id: String,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            gateway,
            store,
            meeting_id,
            notifier,
        }
    }

    /// Classify spoken command text into a structured command.
    pub async fn process_command(&self, command_text: &str) -> Result<VoiceCommand> {
        let raw = self
            .gateway
            .complete(CompletionKind::ProcessCommand, command_text)
            .await?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::Response(format!("unparseable command classification: {}", e)))
    }

    /// Extract task fields from the details and persist an action item.
    pub async fn create_task(&self, details: &str) -> Result<()> {
        let raw = self
            .gateway
            .complete(CompletionKind::AnalyzeTranscript, details)
            .await?;
        let fields: TaskFields = serde_json::from_str(&raw)
            .map_err(|e| Error::Response(format!("unparseable task fields: {}", e)))?;

        self.store
            .insert_action_item(ActionItemRow {
                meeting_id: self.meeting_id.clone(),
                content: fields.title,
                due_date: fields.due_date,
                assignee: fields.assignee,
                completed: false,
                created_at: Utc::now(),
            })
            .await?;

        self.notifier.notify(NoticeKind::Success, "Task created");
        Ok(())
    }

    /// Have the AI service extract scheduling details. Calendar integration
    /// is the embedding application's side; here the parsed result only
    /// confirms the request was understood.
    pub async fn schedule_followup(&self, details: &str) -> Result<()> {
        self.gateway
            .complete(CompletionKind::ProcessCommand, details)
            .await?;
        self.notifier
            .notify(NoticeKind::Success, "Follow-up scheduled");
        Ok(())
    }

    /// Generate a summary of the given transcript text.
    pub async fn generate_summary(&self, full_transcript: &str) -> Result<String> {
        let summary = self
            .gateway
            .complete(CompletionKind::GenerateSummary, full_transcript)
            .await?;
        info!("Generated meeting summary ({} chars)", summary.len());
        Ok(summary)
    }

    /// Fire-and-forget action-item extraction on a finalized segment.
    /// Failures are logged, never surfaced to the user.
    pub fn analyze_realtime(self: &Arc<Self>, transcript: String) {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = service.analyze_realtime_inner(&transcript).await {
                warn!("Background transcript analysis failed: {}", e);
            }
        });
    }

    async fn analyze_realtime_inner(&self, transcript: &str) -> Result<()> {
        let raw = self
            .gateway
            .complete(CompletionKind::AnalyzeTranscript, transcript)
            .await?;
        let insights: TranscriptInsights = serde_json::from_str(&raw)
            .map_err(|e| Error::Response(format!("unparseable transcript insights: {}", e)))?;

        for item in insights.action_items {
            self.store
                .insert_action_item(ActionItemRow {
                    meeting_id: self.meeting_id.clone(),
                    content: item,
                    due_date: None,
                    assignee: None,
                    completed: false,
                    created_at: Utc::now(),
                })
                .await?;
        }
        Ok(())
    }
}
