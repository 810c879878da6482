//! Signaling payload types.
//!
//! The transport that carries these between participants (socket, message
//! queue, anything ordered) is outside this crate; only the shapes are
//! fixed here so both ends agree on the wire format.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

/// Local or remote session description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    pub sdp: String,
}

/// ICE candidate relayed through the signaling channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(rename = "sdpMid")]
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_mline_index: Option<u32>,
}

/// Envelope for messages exchanged over the signaling channel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SignalMessage {
    Offer {
        participant_id: String,
        description: SessionDescription,
    },
    Answer {
        participant_id: String,
        description: SessionDescription,
    },
    Candidate {
        participant_id: String,
        candidate: IceCandidate,
    },
}
