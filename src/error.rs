use thiserror::Error;

/// Failure taxonomy for the meeting core.
///
/// Policy: transient network-shaped failures (gateway, persistence) get
/// bounded automatic retry at the layer that owns them; device/permission
/// and negotiation failures never auto-retry.
#[derive(Debug, Error)]
pub enum Error {
    #[error("media device access failed: {0}")]
    DeviceAccess(String),

    #[error("peer setup failed for {participant_id}: {reason}")]
    PeerSetup {
        participant_id: String,
        reason: String,
    },

    #[error("screen capture unavailable: {0}")]
    ScreenShare(String),

    #[error("speech recognition failed: {0}")]
    Recognition(String),

    #[error("transcript persistence failed: {0}")]
    Persistence(String),

    #[error("assistant gateway failed after {attempts} attempt(s): {reason}")]
    Gateway { attempts: u32, reason: String },

    #[error("malformed assistant response: {0}")]
    Response(String),
}

pub type Result<T> = std::result::Result<T, Error>;
