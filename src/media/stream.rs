use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Media track kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
}

#[derive(Debug)]
struct TrackShared {
    enabled: AtomicBool,
    live: AtomicBool,
}

/// Handle to a single capture track.
///
/// Clones share state: disabling or stopping through any handle is visible
/// through every other handle, matching platform track semantics.
#[derive(Debug, Clone)]
pub struct MediaTrack {
    id: String,
    kind: MediaKind,
    shared: Arc<TrackShared>,
}

impl MediaTrack {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            shared: Arc::new(TrackShared {
                enabled: AtomicBool::new(true),
                live: AtomicBool::new(true),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Mute/unmute without releasing the device.
    pub fn set_enabled(&self, enabled: bool) {
        self.shared.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.enabled.load(Ordering::SeqCst)
    }

    /// Release the underlying device. Irreversible for this track.
    pub fn stop(&self) {
        self.shared.live.store(false, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        self.shared.live.load(Ordering::SeqCst)
    }
}

/// A group of tracks acquired together (camera+mic, display capture, or a
/// remote peer's media).
#[derive(Debug, Clone)]
pub struct MediaStream {
    id: String,
    tracks: Vec<MediaTrack>,
}

impl MediaStream {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    pub fn tracks_of(&self, kind: MediaKind) -> impl Iterator<Item = &MediaTrack> {
        self.tracks.iter().filter(move |t| t.kind() == kind)
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = &MediaTrack> {
        self.tracks_of(MediaKind::Audio)
    }

    pub fn video_tracks(&self) -> impl Iterator<Item = &MediaTrack> {
        self.tracks_of(MediaKind::Video)
    }

    /// Stop every track in the stream.
    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }

    /// True while at least one track still holds its device.
    pub fn is_live(&self) -> bool {
        self.tracks.iter().any(|t| t.is_live())
    }
}
