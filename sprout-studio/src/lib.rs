//! # Sprout Capture Studio (sprout-studio)
//!
//! Evidence capture for developmental milestones.
//!
//! **Purpose:** Acquire the camera, record one attempt per milestone, let the
//! caregiver review or retake it, upload the result, and re-derive the
//! progression from the backend's answer.
//!
//! **Architecture:** Platform media access sits behind the traits in
//! [`capture`]; [`session::RecordingSession`] is the single owner of the
//! device; [`api::BackendClient`] speaks to the caregiver backend over HTTP.

pub mod api;
pub mod capture;
pub mod error;
pub mod logging;
pub mod presenter;
pub mod session;
pub mod studio;
pub mod upload;

pub use error::{ApiError, DeviceError, SessionError, StudioError, UploadError};
pub use session::{RecordingSession, SessionOptions, SessionPhase, SessionState};
pub use studio::{SnapshotSource, Studio};
