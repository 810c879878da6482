use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

use crate::captions::CaptionConfig;
use crate::media::CaptureConstraints;
use crate::peer::IceConfig;
use crate::session::SessionConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub media: MediaConfig,
    pub captions: CaptionsConfig,
    pub transcript: TranscriptConfig,
    pub voice: VoiceConfig,
    pub assistant: AssistantConfig,
    pub ice: IceSection,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MediaConfig {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub audio: bool,
}

#[derive(Debug, Deserialize)]
pub struct CaptionsConfig {
    pub display_duration_ms: u64,
    pub max_words: usize,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptConfig {
    pub batch_interval_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct VoiceConfig {
    pub wake_word: String,
}

#[derive(Debug, Deserialize)]
pub struct AssistantConfig {
    pub endpoint: String,
    pub retry_attempts: u32,
    pub base_delay_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct IceSection {
    pub stun_servers: Vec<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Build a per-meeting session config from the file settings.
    pub fn session_config(&self, meeting_id: Option<String>) -> SessionConfig {
        SessionConfig {
            meeting_id: meeting_id
                .unwrap_or_else(|| format!("meeting-{}", uuid::Uuid::new_v4())),
            speaker_id: "You".to_string(),
            capture: CaptureConstraints {
                width: self.media.width,
                height: self.media.height,
                frame_rate: self.media.frame_rate,
                audio: self.media.audio,
            },
            captions: CaptionConfig {
                display_duration_ms: self.captions.display_duration_ms,
                max_words: self.captions.max_words,
            },
            batch_interval: Duration::from_millis(self.transcript.batch_interval_ms),
            wake_word: self.voice.wake_word.clone(),
            gateway_endpoint: self.assistant.endpoint.clone(),
            gateway_retry_attempts: self.assistant.retry_attempts,
            gateway_base_delay: Duration::from_millis(self.assistant.base_delay_ms),
            ice: IceConfig {
                stun_servers: self.ice.stun_servers.clone(),
            },
        }
    }
}
