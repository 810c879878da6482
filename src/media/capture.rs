use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::Result;

use super::devices::{CaptureConstraints, MediaDevices};
use super::stream::{MediaKind, MediaStream};

/// Local device state. Exclusively owned by `CaptureManager`; only its
/// init/toggle/cleanup operations mutate it.
#[derive(Debug, Clone)]
pub struct LocalMediaState {
    pub stream: Option<MediaStream>,
    pub audio_enabled: bool,
    pub video_enabled: bool,
}

impl Default for LocalMediaState {
    fn default() -> Self {
        Self {
            stream: None,
            audio_enabled: true,
            video_enabled: true,
        }
    }
}

/// Acquires and releases the local camera+microphone stream.
///
/// Single-owner semantics: this manager is the only component that stops
/// local tracks. Everyone else receives the stream by handle and must not
/// release it.
pub struct CaptureManager {
    devices: Arc<dyn MediaDevices>,
    state: Mutex<LocalMediaState>,
}

impl CaptureManager {
    pub fn new(devices: Arc<dyn MediaDevices>) -> Self {
        Self {
            devices,
            state: Mutex::new(LocalMediaState::default()),
        }
    }

    /// Acquire camera+microphone access.
    ///
    /// Any previously held stream is released first, so re-initialization
    /// (e.g. a device switch) never leaks track handles.
    pub async fn initialize(&self, constraints: &CaptureConstraints) -> Result<MediaStream> {
        let mut state = self.state.lock().await;

        if let Some(previous) = state.stream.take() {
            info!("Releasing previously held local stream {}", previous.id());
            previous.stop_all();
        }

        let stream = self.devices.open_capture(constraints).await?;
        info!(
            "Acquired local stream {} ({} tracks)",
            stream.id(),
            stream.tracks().len()
        );

        state.stream = Some(stream.clone());
        state.audio_enabled = true;
        state.video_enabled = true;

        Ok(stream)
    }

    /// Enable or disable every audio track in the current stream.
    pub async fn toggle_audio(&self, enabled: bool) {
        let mut state = self.state.lock().await;
        match &state.stream {
            Some(stream) => {
                for track in stream.tracks_of(MediaKind::Audio) {
                    track.set_enabled(enabled);
                }
                state.audio_enabled = enabled;
            }
            None => warn!("toggle_audio called without an active stream"),
        }
    }

    /// Enable or disable every video track in the current stream.
    pub async fn toggle_video(&self, enabled: bool) {
        let mut state = self.state.lock().await;
        match &state.stream {
            Some(stream) => {
                for track in stream.tracks_of(MediaKind::Video) {
                    track.set_enabled(enabled);
                }
                state.video_enabled = enabled;
            }
            None => warn!("toggle_video called without an active stream"),
        }
    }

    /// Stop every track and clear the held stream. Idempotent.
    pub async fn cleanup(&self) {
        let mut state = self.state.lock().await;
        if let Some(stream) = state.stream.take() {
            stream.stop_all();
            info!("Released local stream {}", stream.id());
        }
        state.audio_enabled = true;
        state.video_enabled = true;
    }

    pub async fn current_stream(&self) -> Option<MediaStream> {
        self.state.lock().await.stream.clone()
    }

    pub async fn state(&self) -> LocalMediaState {
        self.state.lock().await.clone()
    }
}
