//! Streaming speech-to-text buffering and commit pipeline
//!
//! This module turns partially-ordered recognizer events into:
//! - immediate caption updates (never gated on the commit timer)
//! - debounced, exactly-once persisted transcript utterances
//! - an accumulated final-segment log for summary generation

pub mod committer;
pub mod pipeline;
pub mod recognizer;
pub mod store;

pub use committer::{CaptionUpdate, CommitterConfig, TranscriptCommitter};
pub use pipeline::{TranscriptSegment, TranscriptionPipeline};
pub use recognizer::{RecognizerEvent, SpeechRecognizer};
pub use store::{ActionItemRow, MemoryStore, RecordStore, TranscriptRow};
