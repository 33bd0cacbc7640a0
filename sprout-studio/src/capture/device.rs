//! Platform media seam
//!
//! The platform (browser bridge, mobile shell, test fake) implements these
//! traits. Fragment delivery is push-based: the stream is handed a
//! [`FragmentSink`] when recording starts and pushes into it until the
//! returned [`RecordingTap`] is stopped.

use async_trait::async_trait;
use sprout_common::config::FacingMode;

use super::fragments::FragmentSink;
use crate::error::DeviceError;

/// Video part of a media request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoConstraint {
    /// A camera facing the given direction
    Facing(FacingMode),
    /// Any camera
    Any,
}

/// Camera + microphone request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub video: VideoConstraint,
    pub audio: bool,
}

impl MediaConstraints {
    /// Preferred-facing camera with audio
    pub fn preferred(facing: FacingMode) -> Self {
        Self {
            video: VideoConstraint::Facing(facing),
            audio: true,
        }
    }

    /// Any camera with audio
    pub fn relaxed() -> Self {
        Self {
            video: VideoConstraint::Any,
            audio: true,
        }
    }

    pub fn is_relaxed(&self) -> bool {
        self.video == VideoConstraint::Any
    }
}

/// Source of live camera/microphone streams
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Open a stream satisfying `constraints`.
    ///
    /// Must report an unmet constraint as
    /// [`DeviceError::ConstraintUnsatisfiable`] so the controller can relax it.
    async fn open(&self, constraints: &MediaConstraints) -> Result<Box<dyn MediaStream>, DeviceError>;
}

/// A live device stream
pub trait MediaStream: Send + Sync {
    /// Human-readable device label for diagnostics
    fn label(&self) -> String;

    /// Register `sink` and begin delivering encoded fragments into it
    fn start_recording(&self, sink: FragmentSink) -> Result<Box<dyn RecordingTap>, DeviceError>;

    /// Stop every track and give the hardware back
    fn stop_tracks(&self);
}

/// Active fragment subscription
pub trait RecordingTap: Send {
    /// Flush any buffered data into the sink, then unregister.
    ///
    /// Returns only once no further fragments will be pushed.
    fn stop(self: Box<Self>);
}

/// Live preview target (the viewfinder)
pub trait PreviewSurface: Send {
    fn attach(&mut self, stream: &dyn MediaStream);
    fn detach(&mut self);
}

/// Preview surface that renders nothing (headless use)
#[derive(Debug, Default)]
pub struct NullPreview;

impl PreviewSurface for NullPreview {
    fn attach(&mut self, _stream: &dyn MediaStream) {}
    fn detach(&mut self) {}
}
