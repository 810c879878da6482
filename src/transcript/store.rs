use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::Result;

/// A committed transcript utterance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRow {
    pub meeting_id: String,
    pub speaker_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// An extracted or dictated action item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItemRow {
    pub meeting_id: String,
    pub content: String,
    pub due_date: Option<String>,
    pub assignee: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Persistence collaborator for meeting records.
///
/// Insert-only: the core never updates or deletes what it has written.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_transcript(&self, row: TranscriptRow) -> Result<()>;
    async fn insert_action_item(&self, row: ActionItemRow) -> Result<()>;
}

/// In-memory store, used by tests and the demo binary.
#[derive(Default)]
pub struct MemoryStore {
    transcripts: Mutex<Vec<TranscriptRow>>,
    action_items: Mutex<Vec<ActionItemRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn transcripts(&self) -> Vec<TranscriptRow> {
        self.transcripts.lock().await.clone()
    }

    pub async fn action_items(&self) -> Vec<ActionItemRow> {
        self.action_items.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn insert_transcript(&self, row: TranscriptRow) -> Result<()> {
        self.transcripts.lock().await.push(row);
        Ok(())
    }

    async fn insert_action_item(&self, row: ActionItemRow) -> Result<()> {
        self.action_items.lock().await.push(row);
        Ok(())
    }
}
