use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::assist::GatewayConfig;
use crate::captions::CaptionConfig;
use crate::media::CaptureConstraints;
use crate::peer::IceConfig;

/// Configuration for one meeting session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique meeting identifier
    pub meeting_id: String,

    /// Speaker attributed to local recognition results
    pub speaker_id: String,

    /// Camera/microphone constraints
    pub capture: CaptureConstraints,

    /// Caption display window
    pub captions: CaptionConfig,

    /// Quiet period before buffered interim speech is committed
    pub batch_interval: Duration,

    /// Trigger phrase for voice commands
    pub wake_word: String,

    /// AI gateway endpoint
    pub gateway_endpoint: String,

    /// Gateway retry attempts before a terminal failure
    pub gateway_retry_attempts: u32,

    /// Gateway backoff unit (delay = attempt × base)
    pub gateway_base_delay: Duration,

    /// ICE servers for peer connection setup
    pub ice: IceConfig,
}

impl SessionConfig {
    /// Gateway connection settings for this session's meeting.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            endpoint: self.gateway_endpoint.clone(),
            meeting_id: self.meeting_id.clone(),
            retry_attempts: self.gateway_retry_attempts,
            base_delay: self.gateway_base_delay,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            meeting_id: format!("meeting-{}", uuid::Uuid::new_v4()),
            speaker_id: "You".to_string(),
            capture: CaptureConstraints::default(),
            captions: CaptionConfig::default(),
            batch_interval: Duration::from_millis(2000),
            wake_word: "magic".to_string(),
            gateway_endpoint: "http://localhost:8080/api/ai-assistant".to_string(),
            gateway_retry_attempts: 3,
            gateway_base_delay: Duration::from_millis(1000),
            ice: IceConfig::default(),
        }
    }
}
