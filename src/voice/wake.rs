/// Result of scanning an utterance for the wake word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeMatch {
    pub matched: bool,
    /// Text after the wake word, lowercased and trimmed
    pub remainder: String,
}

/// Wake-word tokenizer.
///
/// Matching is case-insensitive; when the wake word appears more than once
/// in one utterance, the first occurrence wins and everything after it is
/// the command text. Text before the wake word is ignored.
#[derive(Debug, Clone)]
pub struct WakeWord {
    word: String,
}

impl WakeWord {
    pub fn new(word: &str) -> Self {
        Self {
            word: word.trim().to_lowercase(),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn scan(&self, text: &str) -> WakeMatch {
        let lowered = text.to_lowercase();
        match lowered.find(&self.word) {
            Some(index) => WakeMatch {
                matched: true,
                remainder: lowered[index + self.word.len()..].trim().to_string(),
            },
            None => WakeMatch {
                matched: false,
                remainder: String::new(),
            },
        }
    }
}

impl Default for WakeWord {
    fn default() -> Self {
        Self::new("magic")
    }
}
