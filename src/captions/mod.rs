pub mod buffer;

pub use buffer::{CaptionBuffer, CaptionConfig};
