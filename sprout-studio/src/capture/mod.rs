//! Media Capture Controller
//!
//! Owns camera/microphone acquisition and produces finished recording
//! artifacts:
//! - `device`: platform seam (`MediaDevices`, `MediaStream`, `PreviewSurface`)
//! - `controller`: acquisition with one relaxed retry, scoped `DeviceHandle`
//! - `fragments`: append-only fragment sink and the immutable `Artifact`

pub mod controller;
pub mod device;
pub mod fragments;

pub use controller::{CaptureController, DeviceHandle};
pub use device::{
    MediaConstraints, MediaDevices, MediaStream, NullPreview, PreviewSurface, RecordingTap,
    VideoConstraint,
};
pub use fragments::{Artifact, FragmentSink, MediaFragment, DEFAULT_CONTENT_TYPE};
