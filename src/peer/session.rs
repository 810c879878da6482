use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::media::{MediaKind, MediaStream, MediaTrack};

use super::signaling::{IceCandidate, SessionDescription};

/// Per-peer connection lifecycle: `New → Connecting → Connected` and then
/// either `Failed` or `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    New,
    Connecting,
    Connected,
    Failed,
    Closed,
}

/// Events emitted by a connection session
#[derive(Debug, Clone)]
pub enum PeerEvent {
    /// A remote media stream arrived (or gained a track)
    RemoteTrack(MediaStream),
    /// The connection transitioned to a new state
    StateChange(PeerState),
}

/// ICE server configuration for connection setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceConfig {
    pub stun_servers: Vec<String>,
}

impl Default for IceConfig {
    fn default() -> Self {
        Self {
            stun_servers: vec![
                "stun:stun.l.google.com:19302".to_string(),
                "stun:stun1.l.google.com:19302".to_string(),
            ],
        }
    }
}

/// One negotiated media connection to a single remote participant.
///
/// Implementations wrap the platform connection primitive; the orchestrator
/// only drives this interface and never touches the transport itself.
#[async_trait::async_trait]
pub trait PeerSession: Send + Sync {
    /// Attach an outbound track.
    async fn add_track(&self, track: MediaTrack) -> Result<()>;

    /// Swap the outbound track of the given kind without renegotiating.
    async fn replace_track(&self, kind: MediaKind, track: MediaTrack) -> Result<()>;

    /// Create a local session description to offer through signaling.
    async fn create_offer(&self) -> Result<SessionDescription>;

    /// Apply a remote description received through signaling.
    async fn apply_remote_description(&self, description: SessionDescription) -> Result<()>;

    /// Apply a remote ICE candidate received through signaling.
    async fn add_remote_candidate(&self, candidate: IceCandidate) -> Result<()>;

    /// Tear the connection down. Safe to call more than once.
    async fn close(&self);
}

/// Creates connection sessions.
///
/// `connect` returns the session handle together with the receiver for its
/// events; the orchestrator owns both for the record's lifetime.
#[async_trait::async_trait]
pub trait PeerSessionFactory: Send + Sync {
    async fn connect(
        &self,
        participant_id: &str,
        ice: &IceConfig,
    ) -> Result<(Box<dyn PeerSession>, mpsc::Receiver<PeerEvent>)>;
}
