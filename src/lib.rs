pub mod assist;
pub mod captions;
pub mod config;
pub mod error;
pub mod media;
pub mod notify;
pub mod peer;
pub mod session;
pub mod transcript;
pub mod voice;

pub use assist::{
    AssistantGateway, AssistantService, CommandKind, CompletionKind, GatewayConfig,
    HttpAssistantGateway, VoiceCommand,
};
pub use captions::{CaptionBuffer, CaptionConfig};
pub use config::Config;
pub use error::{Error, Result};
pub use media::{
    CaptureConstraints, CaptureManager, LocalMediaState, MediaDevices, MediaKind, MediaStream,
    MediaTrack,
};
pub use notify::{ChannelNotifier, LogNotifier, Notice, NoticeKind, Notifier};
pub use peer::{
    IceCandidate, IceConfig, PeerEvent, PeerOrchestrator, PeerSession, PeerSessionFactory,
    PeerState, SdpKind, SessionDescription, SignalMessage, StreamMap,
};
pub use session::{MeetingSession, SessionChannels, SessionConfig, SessionStats};
pub use transcript::{
    ActionItemRow, CaptionUpdate, CommitterConfig, MemoryStore, RecognizerEvent, RecordStore,
    SpeechRecognizer, TranscriptCommitter, TranscriptRow, TranscriptSegment,
    TranscriptionPipeline,
};
pub use voice::{InterpreterPhase, VoiceCommandInterpreter, WakeMatch, WakeWord};
