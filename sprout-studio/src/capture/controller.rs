//! Device acquisition and scoped ownership
//!
//! Acquisition tries the preferred camera first. Only an unmet constraint
//! triggers the single relaxed retry; permission failures surface at once.
//! The acquired [`DeviceHandle`] releases the hardware exactly once, either
//! explicitly or when dropped.

use std::sync::Arc;

use sprout_common::config::FacingMode;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::device::{MediaConstraints, MediaDevices, MediaStream};
use crate::error::DeviceError;

/// Exclusive owner of one acquired device stream
pub struct DeviceHandle {
    stream: Box<dyn MediaStream>,
    relaxed: bool,
    released: bool,
}

impl DeviceHandle {
    fn new(stream: Box<dyn MediaStream>, relaxed: bool) -> Self {
        Self {
            stream,
            relaxed,
            released: false,
        }
    }

    pub fn stream(&self) -> &dyn MediaStream {
        self.stream.as_ref()
    }

    /// Whether acquisition needed the relaxed constraint
    pub fn is_relaxed(&self) -> bool {
        self.relaxed
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Stop the device tracks. Idempotent; returns whether this call released.
    pub fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        self.stream.stop_tracks();
        debug!(device = %self.stream.label(), "Device released");
        true
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("device", &self.stream.label())
            .field("relaxed", &self.relaxed)
            .field("released", &self.released)
            .finish()
    }
}

/// Media Capture Controller
#[derive(Clone)]
pub struct CaptureController {
    devices: Arc<dyn MediaDevices>,
    preferred: FacingMode,
}

impl CaptureController {
    pub fn new(devices: Arc<dyn MediaDevices>, preferred: FacingMode) -> Self {
        Self { devices, preferred }
    }

    pub fn preferred_facing(&self) -> FacingMode {
        self.preferred
    }

    /// Acquire a device, preferring the configured facing.
    ///
    /// # Errors
    /// - `PermissionDenied`: returned immediately, never retried
    /// - `DeviceUnavailable`: the relaxed retry also failed on constraints,
    ///   or the platform reported no usable device
    /// - `Cancelled`: `cancel` fired before a stream arrived
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<DeviceHandle, DeviceError> {
        let preferred = MediaConstraints::preferred(self.preferred);

        match self.open(&preferred, cancel).await {
            Ok(stream) => {
                info!(device = %stream.label(), facing = %self.preferred, "Camera acquired");
                Ok(DeviceHandle::new(stream, false))
            }
            Err(DeviceError::ConstraintUnsatisfiable(detail)) => {
                warn!(
                    facing = %self.preferred,
                    detail = %detail,
                    "Preferred camera unavailable, retrying with any camera"
                );
                self.acquire_relaxed(cancel).await
            }
            Err(e) => Err(e),
        }
    }

    /// Acquire any camera, skipping the preferred-facing attempt.
    ///
    /// Used for the relaxed retry and for a manual retry after a permission
    /// failure.
    pub async fn acquire_relaxed(&self, cancel: &CancellationToken) -> Result<DeviceHandle, DeviceError> {
        match self.open(&MediaConstraints::relaxed(), cancel).await {
            Ok(stream) => {
                info!(device = %stream.label(), "Camera acquired with relaxed constraints");
                Ok(DeviceHandle::new(stream, true))
            }
            Err(DeviceError::ConstraintUnsatisfiable(detail)) => {
                Err(DeviceError::DeviceUnavailable(detail))
            }
            Err(e) => Err(e),
        }
    }

    async fn open(
        &self,
        constraints: &MediaConstraints,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn MediaStream>, DeviceError> {
        debug!(?constraints, "Requesting media stream");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Media request abandoned");
                Err(DeviceError::Cancelled)
            }
            result = self.devices.open(constraints) => result,
        }
    }
}
