//! Meeting session management
//!
//! `MeetingSession` constructs and owns one of each core component per
//! meeting: local capture, peer orchestration, the transcription pipeline,
//! and the voice command interpreter, wired over channels handed back to
//! the embedding UI.

mod config;
mod session;
mod stats;

pub use config::SessionConfig;
pub use session::{MeetingSession, SessionChannels};
pub use stats::SessionStats;
