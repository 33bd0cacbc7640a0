//! Error types for sprout-studio
//!
//! Every failure leaves a recording session either fatally displayed
//! (`PermissionDenied`, `DeviceUnavailable`) or recoverable by a user action
//! (`UploadFailed` → resubmit or retake, `EmptyArtifact` → retake).

use thiserror::Error;

/// Camera/microphone acquisition errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// User or platform refused access; fatal until a manual retry
    #[error("Camera access denied: {0}")]
    PermissionDenied(String),

    /// Requested constraint (e.g. rear camera) cannot be met
    #[error("Camera constraint not satisfiable: {0}")]
    ConstraintUnsatisfiable(String),

    /// No usable device; carries the raw diagnostic
    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// Acquisition abandoned because the capture screen went away
    #[error("Camera acquisition cancelled")]
    Cancelled,
}

/// Evidence upload errors; always recoverable by manual resubmission
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// Transport failure; whether the server stored the file is unknown
    #[error("Upload failed: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("Upload rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Payload could not be assembled
    #[error("Invalid upload payload: {0}")]
    InvalidPayload(String),
}

/// Backend request errors outside the upload path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Snapshot could not be fetched; shown as an empty/error state, not retried
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Response parse error: {0}")]
    Parse(String),

    /// HTTP client could not be constructed
    #[error("Client error: {0}")]
    Client(String),
}

/// Recording session errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    UploadFailed(#[from] UploadError),

    /// Zero-length artifact blocked before upload
    #[error("Recording is empty; retake before submitting")]
    EmptyArtifact,

    /// Submit called with no finalized artifact under review
    #[error("No recording under review")]
    NotReviewing,

    /// In-flight work abandoned because the session was torn down
    #[error("Session cancelled")]
    Cancelled,

    /// Session already torn down
    #[error("Session closed")]
    Closed,
}

/// Convenience Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors from the end-to-end capture flow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StudioError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
