//! Capture flow orchestration
//!
//! Ties the pieces together the way the caregiver moves through them:
//! resolve the snapshot, pick a navigable action, record, submit, then
//! re-fetch so the backend's new milestone states drive the next view.
//! Nothing here mutates milestone state locally.

use std::sync::Arc;

use async_trait::async_trait;
use sprout_common::config::TomlConfig;
use sprout_common::events::EventBus;
use sprout_common::model::ChildSnapshot;
use sprout_common::ChildId;
use sprout_path::{resolve_snapshot, Navigation, Progression};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::{ApiContext, BackendClient};
use crate::capture::{CaptureController, MediaDevices, PreviewSurface};
use crate::error::{ApiError, SessionError, StudioError};
use crate::session::{RecordingSession, SessionOptions};
use crate::upload::EvidenceTransport;

/// Source of child snapshots
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self, child_id: ChildId) -> Result<ChildSnapshot, ApiError>;
}

#[async_trait]
impl SnapshotSource for BackendClient {
    async fn fetch_snapshot(&self, child_id: ChildId) -> Result<ChildSnapshot, ApiError> {
        BackendClient::fetch_snapshot(self, child_id).await
    }
}

/// Capture studio for one caregiver client
pub struct Studio {
    snapshots: Arc<dyn SnapshotSource>,
    transport: Arc<dyn EvidenceTransport>,
    controller: CaptureController,
    options: SessionOptions,
    events: EventBus,
}

impl Studio {
    pub fn new(
        snapshots: Arc<dyn SnapshotSource>,
        transport: Arc<dyn EvidenceTransport>,
        controller: CaptureController,
        options: SessionOptions,
    ) -> Self {
        Self {
            snapshots,
            transport,
            controller,
            options,
            events: EventBus::default(),
        }
    }

    /// Studio backed by one client for both snapshots and uploads
    pub fn with_backend(client: BackendClient, controller: CaptureController, options: SessionOptions) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client, controller, options)
    }

    /// Studio wired from bootstrap configuration and a platform device source
    pub fn from_config(config: &TomlConfig, devices: Arc<dyn MediaDevices>) -> Result<Self, ApiError> {
        let client = BackendClient::new(ApiContext::from(&config.api))?;
        let controller = CaptureController::new(devices, config.capture.preferred_facing);
        Ok(Self::with_backend(
            client,
            controller,
            SessionOptions::from(&config.capture),
        ))
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Fetch and resolve. A failed fetch is surfaced, never retried.
    pub async fn load(&self, child_id: ChildId) -> Result<Progression, ApiError> {
        let snapshot = self.snapshots.fetch_snapshot(child_id).await.map_err(|e| {
            warn!(child_id = %child_id, error = %e, "Child snapshot unavailable");
            e
        })?;
        Ok(resolve_snapshot(&snapshot))
    }

    /// Open a recording session for the milestone a navigation targets
    pub async fn begin_capture(
        &self,
        navigation: &Navigation,
        preview: Box<dyn PreviewSurface>,
        cancel: &CancellationToken,
    ) -> Result<RecordingSession, SessionError> {
        info!(route = %navigation.route(), "Opening capture");
        RecordingSession::open(
            &self.controller,
            navigation.milestone_id(),
            preview,
            self.options,
            self.events.clone(),
            cancel,
        )
        .await
    }

    /// Manual retry after a permission failure; asks for any camera directly
    pub async fn retry_capture(
        &self,
        navigation: &Navigation,
        preview: Box<dyn PreviewSurface>,
        cancel: &CancellationToken,
    ) -> Result<RecordingSession, SessionError> {
        info!(route = %navigation.route(), "Retrying capture with any camera");
        let device = self.controller.acquire_relaxed(cancel).await?;
        Ok(RecordingSession::with_device(
            device,
            navigation.milestone_id(),
            preview,
            self.options,
            self.events.clone(),
            cancel,
        ))
    }

    /// Submit the session's artifact, then re-derive from fresh server state
    pub async fn submit_and_refresh(
        &self,
        session: &mut RecordingSession,
        child_id: ChildId,
    ) -> Result<Progression, StudioError> {
        session.submit(self.transport.as_ref()).await?;
        Ok(self.load(child_id).await?)
    }
}
