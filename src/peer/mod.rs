//! Peer connection orchestration
//!
//! One connection session per remote participant, a live map of
//! participant → remote stream, and screen-share track substitution.
//! Offer/answer/candidate exchange rides on an external signaling channel;
//! only the payload shapes are defined here.

pub mod orchestrator;
pub mod session;
pub mod signaling;

pub use orchestrator::{PeerOrchestrator, StreamMap};
pub use session::{IceConfig, PeerEvent, PeerSession, PeerSessionFactory, PeerState};
pub use signaling::{IceCandidate, SdpKind, SessionDescription, SignalMessage};
