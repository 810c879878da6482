use serde::{Deserialize, Serialize};

/// Display window configuration for live captions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionConfig {
    /// How long a finalized segment stays visible
    pub display_duration_ms: u64,
    /// Maximum number of words rendered at once
    pub max_words: usize,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            display_duration_ms: 10_000, // 10 seconds
            max_words: 50,
        }
    }
}

#[derive(Debug, Clone)]
struct CaptionEntry {
    text: String,
    timestamp_ms: u64,
    speaker: String,
}

/// Bounded, time-pruned caption window.
///
/// Pure state machine over its internal log: finalized segments append to
/// the log, every update prunes entries older than the display duration,
/// and the render keeps only the trailing `max_words` tokens. Interim text
/// never mutates the log; a caller that wants live interim captions
/// displays that text directly.
pub struct CaptionBuffer {
    config: CaptionConfig,
    entries: Vec<CaptionEntry>,
    speaker: String,
}

impl CaptionBuffer {
    pub fn new(config: CaptionConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            speaker: "You".to_string(),
        }
    }

    /// Feed a recognition result and get the current display string.
    pub fn update(&mut self, text: &str, is_final: bool) -> String {
        self.update_at(text, is_final, now_ms())
    }

    /// Same as `update` with an explicit clock, for deterministic pruning.
    pub fn update_at(&mut self, text: &str, is_final: bool, now_ms: u64) -> String {
        if is_final {
            self.entries.push(CaptionEntry {
                text: text.to_string(),
                timestamp_ms: now_ms,
                speaker: self.speaker.clone(),
            });
        }
        self.prune(now_ms);
        self.render()
    }

    fn prune(&mut self, now_ms: u64) {
        let keep_within = self.config.display_duration_ms;
        self.entries
            .retain(|entry| now_ms.saturating_sub(entry.timestamp_ms) < keep_within);
    }

    fn render(&self) -> String {
        let joined = self
            .entries
            .iter()
            .map(|entry| format!("{}: {}", entry.speaker, entry.text))
            .collect::<Vec<_>>()
            .join(" ");

        let words: Vec<&str> = joined.split_whitespace().collect();
        let start = words.len().saturating_sub(self.config.max_words);
        words[start..].join(" ")
    }

    /// Change the speaker attributed to subsequent segments.
    pub fn set_speaker(&mut self, speaker: &str) {
        self.speaker = speaker.to_string();
    }

    /// Clear the log.
    pub fn cleanup(&mut self) {
        self.entries.clear();
    }
}

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}
