use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::error;

use crate::error::Result;

use super::store::{RecordStore, TranscriptRow};

/// Caption-path update, forwarded before any commit bookkeeping so the
/// display never waits on the debounce timer.
#[derive(Debug, Clone)]
pub struct CaptionUpdate {
    pub text: String,
    pub speaker: String,
    pub is_final: bool,
}

/// Debounce configuration for transcript commits
#[derive(Debug, Clone)]
pub struct CommitterConfig {
    /// Quiet period after the last interim result before the buffer is
    /// committed as if final
    pub batch_interval: Duration,
}

impl Default for CommitterConfig {
    fn default() -> Self {
        Self {
            batch_interval: Duration::from_millis(2000),
        }
    }
}

/// Turns a bursty stream of interim recognition results into discrete,
/// persisted utterances.
///
/// A final result commits immediately; interim results accumulate in the
/// buffer and re-arm the debounce timer, so at most one commit happens per
/// quiet period. On persistence failure the buffer is retained so the
/// caller can resubmit the same content instead of silently losing it.
pub struct TranscriptCommitter {
    store: Arc<dyn RecordStore>,
    meeting_id: String,
    speaker_id: String,
    batch_interval: Duration,
    buffer: Mutex<String>,
    debounce: Mutex<Option<JoinHandle<()>>>,
    caption_tx: mpsc::UnboundedSender<CaptionUpdate>,
}

impl TranscriptCommitter {
    pub fn new(
        store: Arc<dyn RecordStore>,
        meeting_id: String,
        speaker_id: String,
        config: CommitterConfig,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<CaptionUpdate>) {
        let (caption_tx, caption_rx) = mpsc::unbounded_channel();
        let committer = Arc::new(Self {
            store,
            meeting_id,
            speaker_id,
            batch_interval: config.batch_interval,
            buffer: Mutex::new(String::new()),
            debounce: Mutex::new(None),
            caption_tx,
        });
        (committer, caption_rx)
    }

    /// Feed one recognition result.
    pub async fn handle_speech(self: &Arc<Self>, text: &str, is_final: bool) -> Result<()> {
        // Caption path first, unconditionally.
        let _ = self.caption_tx.send(CaptionUpdate {
            text: text.to_string(),
            speaker: self.speaker_id.clone(),
            is_final,
        });

        if is_final {
            self.cancel_timer().await;
            self.commit(text).await
        } else {
            {
                let mut buffer = self.buffer.lock().await;
                if !buffer.is_empty() {
                    buffer.push(' ');
                }
                buffer.push_str(text);
            }
            self.arm_timer().await;
            Ok(())
        }
    }

    async fn arm_timer(self: &Arc<Self>) {
        let mut slot = self.debounce.lock().await;
        if let Some(pending) = slot.take() {
            pending.abort();
        }

        let committer = Arc::clone(self);
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(committer.batch_interval).await;
            // Timer-driven commits have no caller to report to.
            if let Err(e) = committer.commit("").await {
                error!("Debounced transcript commit failed: {}", e);
            }
        }));
    }

    async fn cancel_timer(&self) {
        if let Some(pending) = self.debounce.lock().await.take() {
            pending.abort();
        }
    }

    /// Persist one utterance. Uses the explicit text when given, the
    /// buffered interim content otherwise; empty content is a no-op.
    ///
    /// The buffer is snapshot-taken before the insert: speech arriving
    /// while the store call is in flight accumulates separately and is
    /// never wiped by this commit. On failure the snapshot goes back in
    /// front of anything newer so a retry resubmits it.
    pub async fn commit(&self, text: &str) -> Result<()> {
        // A final supersedes whatever interim text it was buffered as.
        let buffered = std::mem::take(&mut *self.buffer.lock().await);

        let explicit = text.trim();
        let content = if explicit.is_empty() {
            buffered.trim().to_string()
        } else {
            explicit.to_string()
        };

        if content.is_empty() {
            return Ok(());
        }

        let result = self
            .store
            .insert_transcript(TranscriptRow {
                meeting_id: self.meeting_id.clone(),
                speaker_id: self.speaker_id.clone(),
                content,
                timestamp: chrono::Utc::now(),
            })
            .await;

        if result.is_err() && explicit.is_empty() {
            let mut buffer = self.buffer.lock().await;
            if buffer.is_empty() {
                *buffer = buffered;
            } else {
                *buffer = format!("{} {}", buffered.trim(), buffer);
            }
        }

        result
    }

    /// Cancel any pending timer and discard the unsent buffer. Only for
    /// meeting teardown, where losing an unflushed fragment is accepted.
    pub async fn cleanup(&self) {
        self.cancel_timer().await;
        self.buffer.lock().await.clear();
    }
}
