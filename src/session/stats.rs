use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about a meeting session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// When the session was created
    pub started_at: DateTime<Utc>,

    /// Total duration in seconds
    pub duration_secs: f64,

    /// Number of connected remote participants
    pub peer_count: usize,

    /// Number of finalized transcript segments
    pub transcript_segments_count: usize,

    /// Whether transcription is currently running
    pub transcribing: bool,

    /// Whether the voice command interpreter is listening
    pub listening_for_commands: bool,
}
