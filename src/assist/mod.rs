//! AI assistant collaborator
//!
//! The gateway contract (one `complete` operation with bounded retry) and
//! the service layer that parses classifications and applies side effects.

pub mod gateway;
pub mod service;

pub use gateway::{AssistantGateway, CompletionKind, GatewayConfig, HttpAssistantGateway};
pub use service::{AssistantService, CommandKind, VoiceCommand};
