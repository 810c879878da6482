use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::assist::{AssistantService, HttpAssistantGateway, VoiceCommand};
use crate::captions::CaptionBuffer;
use crate::error::Result;
use crate::media::{CaptureManager, MediaDevices, MediaStream};
use crate::notify::Notifier;
use crate::peer::{
    IceCandidate, PeerOrchestrator, PeerSessionFactory, SessionDescription, StreamMap,
};
use crate::transcript::{
    CaptionUpdate, CommitterConfig, RecordStore, SpeechRecognizer, TranscriptCommitter,
    TranscriptSegment, TranscriptionPipeline,
};
use crate::voice::{VoiceCommandInterpreter, WakeWord};

use super::config::SessionConfig;
use super::stats::SessionStats;

/// Event receivers handed to the embedding UI when a session is created.
pub struct SessionChannels {
    /// Full participant → remote stream snapshots
    pub streams: mpsc::UnboundedReceiver<StreamMap>,
    /// Immediate caption-path updates (interim and final)
    pub captions: mpsc::UnboundedReceiver<CaptionUpdate>,
    /// Transcript panel segments (interim and final)
    pub segments: mpsc::UnboundedReceiver<TranscriptSegment>,
    /// Classified voice commands
    pub commands: mpsc::UnboundedReceiver<VoiceCommand>,
    /// Raw text heard by the command recognizer, for UI feedback
    pub command_transcript: mpsc::UnboundedReceiver<String>,
}

/// One meeting's worth of explicitly constructed components.
///
/// Everything is owned per session and passed by reference; there are no
/// process-wide singletons, so two sessions (or two tests) never share
/// device or connection state.
pub struct MeetingSession {
    config: SessionConfig,
    capture: CaptureManager,
    peers: PeerOrchestrator,
    pipeline: TranscriptionPipeline,
    interpreter: VoiceCommandInterpreter,
    assistant: Arc<AssistantService>,
    committer: Arc<TranscriptCommitter>,
    started_at: chrono::DateTime<Utc>,
}

impl MeetingSession {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: SessionConfig,
        devices: Arc<dyn MediaDevices>,
        peer_factory: Arc<dyn PeerSessionFactory>,
        transcription_recognizer: Box<dyn SpeechRecognizer>,
        command_recognizer: Box<dyn SpeechRecognizer>,
        store: Arc<dyn RecordStore>,
        gateway: Arc<dyn crate::assist::AssistantGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, SessionChannels) {
        let capture = CaptureManager::new(Arc::clone(&devices));

        let (peers, streams) = PeerOrchestrator::new(
            peer_factory,
            devices,
            config.ice.clone(),
            Arc::clone(&notifier),
        );

        let assistant = Arc::new(AssistantService::new(
            gateway,
            Arc::clone(&store),
            config.meeting_id.clone(),
            Arc::clone(&notifier),
        ));

        let (committer, captions) = TranscriptCommitter::new(
            store,
            config.meeting_id.clone(),
            config.speaker_id.clone(),
            CommitterConfig {
                batch_interval: config.batch_interval,
            },
        );

        let (pipeline, segments) = TranscriptionPipeline::new(
            transcription_recognizer,
            Arc::clone(&committer),
            config.speaker_id.clone(),
            Some(Arc::clone(&assistant)),
            Arc::clone(&notifier),
        );

        let (interpreter, commands, command_transcript) = VoiceCommandInterpreter::new(
            command_recognizer,
            Arc::clone(&assistant),
            WakeWord::new(&config.wake_word),
            pipeline.transcript_handle(),
            notifier,
        );

        info!("Meeting session created: {}", config.meeting_id);

        let session = Self {
            config,
            capture,
            peers,
            pipeline,
            interpreter,
            assistant,
            committer,
            started_at: Utc::now(),
        };

        let channels = SessionChannels {
            streams,
            captions,
            segments,
            commands,
            command_transcript,
        };

        (session, channels)
    }

    /// Like `new`, with the HTTP assistant gateway built from the
    /// session's own gateway settings.
    #[allow(clippy::too_many_arguments)]
    pub fn with_http_gateway(
        config: SessionConfig,
        devices: Arc<dyn MediaDevices>,
        peer_factory: Arc<dyn PeerSessionFactory>,
        transcription_recognizer: Box<dyn SpeechRecognizer>,
        command_recognizer: Box<dyn SpeechRecognizer>,
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, SessionChannels) {
        let gateway = Arc::new(HttpAssistantGateway::new(config.gateway_config()));
        Self::new(
            config,
            devices,
            peer_factory,
            transcription_recognizer,
            command_recognizer,
            store,
            gateway,
            notifier,
        )
    }

    pub fn meeting_id(&self) -> &str {
        &self.config.meeting_id
    }

    /// A caption display buffer using this session's window settings,
    /// attributed to this session's speaker.
    pub fn caption_buffer(&self) -> CaptionBuffer {
        let mut buffer = CaptionBuffer::new(self.config.captions.clone());
        buffer.set_speaker(&self.config.speaker_id);
        buffer
    }

    // ------------------------------------------------------------------
    // Local media
    // ------------------------------------------------------------------

    /// Acquire the local stream and hand it to the peer orchestrator.
    pub async fn init_local_media(&self) -> Result<MediaStream> {
        let stream = self.capture.initialize(&self.config.capture).await?;
        self.peers.set_local_stream(stream.clone()).await?;
        Ok(stream)
    }

    pub async fn toggle_audio(&self, enabled: bool) {
        self.capture.toggle_audio(enabled).await;
    }

    pub async fn toggle_video(&self, enabled: bool) {
        self.capture.toggle_video(enabled).await;
    }

    pub async fn local_stream(&self) -> Option<MediaStream> {
        self.capture.current_stream().await
    }

    // ------------------------------------------------------------------
    // Peers
    // ------------------------------------------------------------------

    pub async fn add_peer(&self, participant_id: &str) -> Result<()> {
        self.peers.add_peer(participant_id).await
    }

    pub async fn remove_peer(&self, participant_id: &str) {
        self.peers.remove_peer(participant_id).await;
    }

    pub async fn create_offer(&self, participant_id: &str) -> Result<SessionDescription> {
        self.peers.create_offer(participant_id).await
    }

    pub async fn apply_answer(
        &self,
        participant_id: &str,
        description: SessionDescription,
    ) -> Result<()> {
        self.peers.apply_answer(participant_id, description).await
    }

    pub async fn apply_candidate(
        &self,
        participant_id: &str,
        candidate: IceCandidate,
    ) -> Result<()> {
        self.peers.apply_candidate(participant_id, candidate).await
    }

    pub async fn start_screen_share(&self) -> Result<MediaStream> {
        self.peers.start_screen_share().await
    }

    // ------------------------------------------------------------------
    // Transcription & voice commands
    // ------------------------------------------------------------------

    pub async fn start_transcription(&self) -> Result<()> {
        self.pipeline.start().await
    }

    pub async fn stop_transcription(&self) -> Result<()> {
        self.pipeline.stop().await
    }

    pub async fn start_voice_commands(&self) -> Result<()> {
        self.interpreter.start().await
    }

    pub async fn stop_voice_commands(&self) -> Result<()> {
        self.interpreter.stop().await
    }

    /// Summarize everything transcribed so far.
    pub async fn generate_summary(&self) -> Result<String> {
        let segments = self.pipeline.transcript().await;
        let full = segments
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        self.assistant.generate_summary(&full).await
    }

    pub async fn transcript(&self) -> Vec<TranscriptSegment> {
        self.pipeline.transcript().await
    }

    pub async fn stats(&self) -> SessionStats {
        let duration = Utc::now().signed_duration_since(self.started_at);
        SessionStats {
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            peer_count: self.peers.peer_count().await,
            transcript_segments_count: self.pipeline.transcript().await.len(),
            transcribing: self.pipeline.is_active(),
            listening_for_commands: self.interpreter.is_listening(),
        }
    }

    /// Tear the whole session down. Safe to call more than once.
    pub async fn cleanup(&self) {
        if let Err(e) = self.interpreter.stop().await {
            warn!("Failed to stop voice commands during cleanup: {}", e);
        }
        if let Err(e) = self.pipeline.stop().await {
            warn!("Failed to stop transcription during cleanup: {}", e);
        }
        self.committer.cleanup().await;
        self.peers.cleanup().await;
        self.capture.cleanup().await;
        info!("Meeting session cleaned up: {}", self.config.meeting_id);
    }
}
