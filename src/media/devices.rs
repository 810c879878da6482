use crate::error::Result;
use serde::{Deserialize, Serialize};

use super::stream::MediaStream;

/// Capture constraints for camera/microphone acquisition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConstraints {
    /// Requested video width in pixels
    pub width: u32,
    /// Requested video height in pixels
    pub height: u32,
    /// Requested video frame rate
    pub frame_rate: u32,
    /// Whether to request a microphone track
    pub audio: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720, // 720p
            frame_rate: 30,
            audio: true,
        }
    }
}

/// Platform media acquisition seam.
///
/// Implementations wrap whatever the host platform provides for camera,
/// microphone, and display capture. The core never talks to devices
/// directly; it only holds the stream handles an implementation returns.
#[async_trait::async_trait]
pub trait MediaDevices: Send + Sync {
    /// Acquire a camera+microphone stream matching the constraints.
    ///
    /// Fails with `Error::DeviceAccess` when permission is denied or no
    /// device is available.
    async fn open_capture(&self, constraints: &CaptureConstraints) -> Result<MediaStream>;

    /// Acquire a display-capture stream for screen sharing.
    async fn open_display(&self) -> Result<MediaStream>;
}
