pub mod capture;
pub mod devices;
pub mod stream;

pub use capture::{CaptureManager, LocalMediaState};
pub use devices::{CaptureConstraints, MediaDevices};
pub use stream::{MediaKind, MediaStream, MediaTrack};
