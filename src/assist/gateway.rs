use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::error::{Error, Result};

/// Completion request categories understood by the AI service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionKind {
    ProcessCommand,
    AnalyzeTranscript,
    GenerateSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest<'a> {
    #[serde(rename = "type")]
    kind: CompletionKind,
    content: &'a str,
    meeting_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    result: String,
}

/// AI completion collaborator contract.
///
/// `complete` returns the service's raw result string (a JSON-encoded
/// classification or a plain summary); parsing is the caller's job.
#[async_trait::async_trait]
pub trait AssistantGateway: Send + Sync {
    async fn complete(&self, kind: CompletionKind, content: &str) -> Result<String>;
}

/// Gateway connection settings
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub endpoint: String,
    pub meeting_id: String,
    /// Attempts before a terminal failure is surfaced
    pub retry_attempts: u32,
    /// Backoff grows linearly: attempt × base_delay
    pub base_delay: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/api/ai-assistant".to_string(),
            meeting_id: String::new(),
            retry_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

/// HTTP implementation of the gateway contract.
///
/// Transient failures (connection errors, non-2xx responses) are retried
/// up to `retry_attempts` times with linearly increasing backoff, then
/// surfaced as a terminal `Error::Gateway`.
pub struct HttpAssistantGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl HttpAssistantGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn try_complete(&self, kind: CompletionKind, content: &str) -> anyhow::Result<String> {
        let request = CompletionRequest {
            kind,
            content,
            meeting_id: &self.config.meeting_id,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("assistant request failed with status {}", response.status());
        }

        let body: CompletionResponse = response.json().await?;
        Ok(body.result)
    }
}

#[async_trait::async_trait]
impl AssistantGateway for HttpAssistantGateway {
    async fn complete(&self, kind: CompletionKind, content: &str) -> Result<String> {
        let mut last_error = String::new();

        for attempt in 1..=self.config.retry_attempts {
            match self.try_complete(kind, content).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = e.to_string();
                    warn!(
                        "Assistant request attempt {}/{} failed: {}",
                        attempt, self.config.retry_attempts, last_error
                    );
                    if attempt < self.config.retry_attempts {
                        tokio::time::sleep(self.config.base_delay * attempt).await;
                    }
                }
            }
        }

        Err(Error::Gateway {
            attempts: self.config.retry_attempts,
            reason: last_error,
        })
    }
}
