use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::assist::AssistantService;
use crate::error::Result;
use crate::notify::{NoticeKind, Notifier};

use super::committer::TranscriptCommitter;
use super::recognizer::{RecognizerEvent, SpeechRecognizer};

/// One recognized utterance, interim or final
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub speaker: String,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub is_interim: bool,
}

/// Glue between the speech recognizer and the commit path.
///
/// Every result (interim and final) goes to the committer and is relayed
/// to the panel channel; final segments also accumulate in the shared
/// transcript log used for summary generation. A recognizer error stops
/// the pipeline; recovery is restart-from-scratch by the caller.
pub struct TranscriptionPipeline {
    recognizer: Mutex<Box<dyn SpeechRecognizer>>,
    committer: Arc<TranscriptCommitter>,
    speaker_id: String,
    segment_tx: mpsc::UnboundedSender<TranscriptSegment>,
    finals: Arc<Mutex<Vec<TranscriptSegment>>>,
    analyzer: Option<Arc<AssistantService>>,
    task: Mutex<Option<JoinHandle<()>>>,
    active: Arc<AtomicBool>,
    notifier: Arc<dyn Notifier>,
}

impl TranscriptionPipeline {
    pub fn new(
        recognizer: Box<dyn SpeechRecognizer>,
        committer: Arc<TranscriptCommitter>,
        speaker_id: String,
        analyzer: Option<Arc<AssistantService>>,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, mpsc::UnboundedReceiver<TranscriptSegment>) {
        let (segment_tx, segment_rx) = mpsc::unbounded_channel();
        let pipeline = Self {
            recognizer: Mutex::new(recognizer),
            committer,
            speaker_id,
            segment_tx,
            finals: Arc::new(Mutex::new(Vec::new())),
            analyzer,
            task: Mutex::new(None),
            active: Arc::new(AtomicBool::new(false)),
            notifier,
        };
        (pipeline, segment_rx)
    }

    /// Start the recognizer and begin feeding results downstream.
    pub async fn start(&self) -> Result<()> {
        if self.active.load(Ordering::SeqCst) {
            warn!("Transcription already running");
            return Ok(());
        }

        let mut events = self.recognizer.lock().await.start().await?;
        self.active.store(true, Ordering::SeqCst);
        info!("Transcription pipeline started");

        let committer = Arc::clone(&self.committer);
        let segment_tx = self.segment_tx.clone();
        let finals = Arc::clone(&self.finals);
        let analyzer = self.analyzer.clone();
        let active = Arc::clone(&self.active);
        let notifier = Arc::clone(&self.notifier);
        let speaker = self.speaker_id.clone();

        let task = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if !active.load(Ordering::SeqCst) {
                    break;
                }

                match event {
                    RecognizerEvent::Transcript { text, is_final } => {
                        let segment = TranscriptSegment {
                            speaker: speaker.clone(),
                            timestamp: Utc::now(),
                            content: text.clone(),
                            is_interim: !is_final,
                        };

                        if is_final {
                            finals.lock().await.push(segment.clone());
                        }
                        let _ = segment_tx.send(segment);

                        if let Err(e) = committer.handle_speech(&text, is_final).await {
                            error!("Failed to commit transcription: {}", e);
                            notifier.notify(NoticeKind::Error, "Failed to save transcription");
                        }

                        // Opportunistic action-item extraction, best effort.
                        if is_final {
                            if let Some(service) = &analyzer {
                                service.analyze_realtime(text);
                            }
                        }
                    }
                    RecognizerEvent::Error(message) => {
                        error!("Speech recognition error: {}", message);
                        notifier.notify(
                            NoticeKind::Error,
                            &format!("Speech recognition failed: {}", message),
                        );
                        active.store(false, Ordering::SeqCst);
                        break;
                    }
                }
            }
            info!("Transcription pipeline task stopped");
        });

        *self.task.lock().await = Some(task);
        Ok(())
    }

    /// Stop the recognizer and the feed task.
    pub async fn stop(&self) -> Result<()> {
        self.active.store(false, Ordering::SeqCst);
        self.recognizer.lock().await.stop().await?;

        if let Some(task) = self.task.lock().await.take() {
            task.abort();
        }

        info!("Transcription pipeline stopped");
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Accumulated final segments.
    pub async fn transcript(&self) -> Vec<TranscriptSegment> {
        self.finals.lock().await.clone()
    }

    /// Shared handle to the final-segment log (consumed by the voice
    /// command interpreter for summary generation).
    pub fn transcript_handle(&self) -> Arc<Mutex<Vec<TranscriptSegment>>> {
        Arc::clone(&self.finals)
    }
}
