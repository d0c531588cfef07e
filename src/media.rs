//! Media acquisition and playback handles.
//!
//! Device I/O is an external collaborator: the crate defines the seam
//! (`MediaDevices`) and the handle types the session owns, while concrete
//! capture backends live with the embedder.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

/// Fixed constraints applied when opening the microphone.
#[derive(Debug, Clone, Copy)]
pub struct AudioConstraints {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
}

impl Default for AudioConstraints {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
            auto_gain_control: true,
        }
    }
}

/// Microphone acquisition failures.
///
/// `PermissionDenied` and `DeviceNotFound` are recoverable: the session
/// reports them through the status listeners and fails cleanly instead of
/// propagating a fault.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Microphone access was denied. Please allow microphone access to use this feature.")]
    PermissionDenied,

    #[error("No microphone was found. Please connect a microphone to use this feature.")]
    DeviceNotFound,

    #[error("microphone acquisition failed: {0}")]
    Other(String),
}

impl MediaError {
    /// Whether the failure is one of the recoverable acquisition kinds.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::DeviceNotFound)
    }
}

/// The outbound local media stream: the microphone track set attached to the
/// peer connection before offer creation. Dropping it releases the tracks.
#[derive(Clone, Default)]
pub struct LocalAudioStream {
    tracks: Vec<Arc<TrackLocalStaticSample>>,
}

impl LocalAudioStream {
    #[must_use]
    pub fn new(tracks: Vec<Arc<TrackLocalStaticSample>>) -> Self {
        Self { tracks }
    }

    #[must_use]
    pub fn tracks(&self) -> &[Arc<TrackLocalStaticSample>] {
        &self.tracks
    }
}

impl std::fmt::Debug for LocalAudioStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAudioStream")
            .field("tracks", &self.tracks.len())
            .finish()
    }
}

/// Source of local audio input.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Open the default microphone with the given constraints.
    async fn open_input(
        &self,
        constraints: &AudioConstraints,
    ) -> std::result::Result<LocalAudioStream, MediaError>;
}

/// Playback sink handle for remote audio.
///
/// The session owns exactly one sink; the transport attaches the first
/// inbound remote track to it. Rendering is the embedder's concern; the
/// sink only holds the track handle.
#[derive(Clone, Default)]
pub struct AudioSink {
    slot: Arc<Mutex<Option<Arc<TrackRemote>>>>,
}

impl AudioSink {
    /// Attach a remote track. Returns `false` if a stream is already
    /// attached (only the first inbound stream is kept).
    pub fn attach(&self, track: Arc<TrackRemote>) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if slot.is_some() {
            return false;
        }
        *slot = Some(track);
        true
    }

    /// The currently attached remote track, if any.
    #[must_use]
    pub fn current(&self) -> Option<Arc<TrackRemote>> {
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.current().is_some()
    }

    /// Release the attached stream.
    pub fn detach(&self) {
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
    }
}

impl std::fmt::Debug for AudioSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioSink")
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraints_default_to_all_enabled() {
        let constraints = AudioConstraints::default();
        assert!(constraints.echo_cancellation);
        assert!(constraints.noise_suppression);
        assert!(constraints.auto_gain_control);
    }

    #[test]
    fn recoverable_kinds() {
        assert!(MediaError::PermissionDenied.is_recoverable());
        assert!(MediaError::DeviceNotFound.is_recoverable());
        assert!(!MediaError::Other("driver fault".to_string()).is_recoverable());
    }

    #[test]
    fn sink_starts_detached() {
        let sink = AudioSink::default();
        assert!(!sink.is_attached());
        sink.detach();
        assert!(!sink.is_attached());
    }
}
