use tokio::sync::mpsc;

use crate::error::Result;

/// Events emitted by a streaming speech-to-text source.
///
/// Engines emit provisional (interim) hypotheses that may change, followed
/// by a final, stable result for each utterance.
#[derive(Debug, Clone)]
pub enum RecognizerEvent {
    Transcript { text: String, is_final: bool },
    Error(String),
}

/// Streaming speech recognition seam.
///
/// Implementations wrap whatever the platform provides; `start` returns a
/// channel receiver that delivers results in emission order.
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Begin recognition and return the event stream.
    async fn start(&mut self) -> Result<mpsc::Receiver<RecognizerEvent>>;

    /// Stop recognition and cancel the subscription.
    async fn stop(&mut self) -> Result<()>;

    /// Whether the recognizer is currently running
    fn is_active(&self) -> bool;

    /// Recognizer name for logging
    fn name(&self) -> &str;
}
