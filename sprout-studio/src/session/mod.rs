//! Recording Session State Machine
//!
//! One session covers one evidence attempt for one milestone. It owns the
//! device handle for its whole life and releases it on every exit path:
//! successful submit, cancellation, explicit [`RecordingSession::close`], or
//! drop.
//!
//! ```text
//! Idle --start--> Recording --stop--> ReviewingArtifact --submit--> Uploading --ok--> Closed
//!  ^                                     |       ^                     |
//!  +---------------retake----------------+       +-------failure-------+
//! ```

mod state;
mod timer;

pub use state::{SessionPhase, SessionState, StateTransition};
pub use timer::ElapsedCounter;

use sprout_common::config::CaptureConfig;
use sprout_common::events::{EventBus, StudioEvent};
use sprout_common::human_time::format_elapsed;
use sprout_common::time;
use sprout_common::MilestoneId;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::capture::{
    Artifact, CaptureController, DeviceHandle, FragmentSink, PreviewSurface, RecordingTap,
};
use crate::error::{Result, SessionError};
use crate::upload::{evidence_file_name, EvidenceTransport};

/// Per-session behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Forward zero-length artifacts instead of rejecting them
    pub allow_empty_upload: bool,
}

impl From<&CaptureConfig> for SessionOptions {
    fn from(config: &CaptureConfig) -> Self {
        Self {
            allow_empty_upload: config.allow_empty_upload,
        }
    }
}

pub struct RecordingSession {
    id: Uuid,
    milestone_id: MilestoneId,
    device: DeviceHandle,
    preview: Box<dyn PreviewSurface>,
    state: SessionState,
    sink: FragmentSink,
    tap: Option<Box<dyn RecordingTap>>,
    elapsed: ElapsedCounter,
    options: SessionOptions,
    events: EventBus,
    cancel: CancellationToken,
    last_transition: Option<StateTransition>,
}

impl RecordingSession {
    /// Acquire a device and enter `Idle` with the preview attached.
    ///
    /// Cancelling `cancel` abandons acquisition, and later abandons any
    /// in-flight upload of this session.
    pub async fn open(
        controller: &CaptureController,
        milestone_id: MilestoneId,
        preview: Box<dyn PreviewSurface>,
        options: SessionOptions,
        events: EventBus,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let device = controller.acquire(cancel).await?;
        Ok(Self::with_device(
            device,
            milestone_id,
            preview,
            options,
            events,
            cancel,
        ))
    }

    /// Build a session around an already-acquired device
    pub fn with_device(
        device: DeviceHandle,
        milestone_id: MilestoneId,
        mut preview: Box<dyn PreviewSurface>,
        options: SessionOptions,
        events: EventBus,
        cancel: &CancellationToken,
    ) -> Self {
        let id = Uuid::new_v4();
        preview.attach(device.stream());

        info!(
            session_id = %id,
            milestone_id = %milestone_id,
            device = %device.stream().label(),
            relaxed = device.is_relaxed(),
            "Recording session opened"
        );
        events.emit_lossy(StudioEvent::DeviceAcquired {
            session_id: id,
            relaxed: device.is_relaxed(),
            timestamp: time::now(),
        });

        Self {
            id,
            milestone_id,
            device,
            preview,
            state: SessionState::Idle,
            sink: FragmentSink::new(),
            tap: None,
            elapsed: ElapsedCounter::new(),
            options,
            events,
            cancel: cancel.child_token(),
            last_transition: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn milestone_id(&self) -> MilestoneId {
        self.milestone_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.state.artifact()
    }

    /// Most recent state change, `None` until the first one
    pub fn last_transition(&self) -> Option<&StateTransition> {
        self.last_transition.as_ref()
    }

    /// Seconds recorded; frozen while reviewing
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.get()
    }

    /// Elapsed time as `m:ss`
    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.elapsed.get())
    }

    /// Fragments buffered by the recording in progress
    pub fn buffered_fragments(&self) -> usize {
        self.sink.len()
    }

    pub fn device_relaxed(&self) -> bool {
        self.device.is_relaxed()
    }

    /// Token that abandons this session's in-flight work when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// `Idle -> Recording`
    ///
    /// Returns `Ok(false)` without effect from any state other than `Idle`.
    /// If the stream refuses to record, the session stays `Idle`.
    pub fn start(&mut self) -> Result<bool> {
        match self.state {
            SessionState::Idle => {}
            SessionState::Closed => return Err(SessionError::Closed),
            _ => {
                debug!(session_id = %self.id, state = %self.phase(), "start ignored");
                return Ok(false);
            }
        }

        let sink = FragmentSink::new();
        let tap = self.device.stream().start_recording(sink.clone())?;
        self.sink = sink;
        self.tap = Some(tap);
        self.elapsed.start();
        self.transition_to(SessionState::Recording);

        info!(session_id = %self.id, milestone_id = %self.milestone_id, "Recording started");
        self.events.emit_lossy(StudioEvent::RecordingStarted {
            session_id: self.id,
            milestone_id: self.milestone_id,
            timestamp: time::now(),
        });
        Ok(true)
    }

    /// `Recording -> ReviewingArtifact`
    ///
    /// Finalizes whatever was buffered, even nothing. No-op unless recording.
    pub fn stop(&mut self) -> bool {
        if !matches!(self.state, SessionState::Recording) {
            debug!(session_id = %self.id, state = %self.phase(), "stop ignored");
            return false;
        }

        if let Some(tap) = self.tap.take() {
            tap.stop();
        }
        self.sink.close();
        self.elapsed.freeze();

        let fragments = self.sink.take();
        let artifact = Artifact::from_fragments(&fragments, time::now());

        info!(
            session_id = %self.id,
            milestone_id = %self.milestone_id,
            fragments = fragments.len(),
            bytes = artifact.len(),
            content_type = %artifact.content_type(),
            elapsed = %self.elapsed_display(),
            "Recording stopped"
        );
        if artifact.is_empty() {
            warn!(session_id = %self.id, "Recording produced no data");
        }
        self.events.emit_lossy(StudioEvent::RecordingStopped {
            session_id: self.id,
            milestone_id: self.milestone_id,
            bytes: artifact.len() as u64,
            content_type: artifact.content_type().to_string(),
            elapsed_secs: self.elapsed.get(),
            timestamp: time::now(),
        });

        self.transition_to(SessionState::ReviewingArtifact(artifact));
        true
    }

    /// `ReviewingArtifact -> Idle`
    ///
    /// Drops the artifact, zeroes the timer and points the preview back at
    /// the device, which stays held.
    pub fn retake(&mut self) -> bool {
        if !matches!(self.state, SessionState::ReviewingArtifact(_)) {
            debug!(session_id = %self.id, state = %self.phase(), "retake ignored");
            return false;
        }

        self.sink = FragmentSink::new();
        self.elapsed.reset();
        self.preview.detach();
        self.preview.attach(self.device.stream());
        self.transition_to(SessionState::Idle);

        info!(session_id = %self.id, milestone_id = %self.milestone_id, "Artifact discarded for retake");
        self.events.emit_lossy(StudioEvent::ArtifactDiscarded {
            session_id: self.id,
            milestone_id: self.milestone_id,
            timestamp: time::now(),
        });
        true
    }

    /// `ReviewingArtifact -> Uploading -> Closed | ReviewingArtifact`
    ///
    /// On success the session closes and the caller should re-fetch the
    /// child snapshot. On failure the artifact is back under review for a
    /// manual resubmit or retake. Dropping the returned future mid-upload
    /// does the same as a failure.
    ///
    /// # Errors
    /// - `NotReviewing` / `Closed`: nothing to submit
    /// - `EmptyArtifact`: zero-length recording and empty uploads disallowed
    /// - `UploadFailed`: transport error, session back in review
    /// - `Cancelled`: session token fired mid-upload, session closed
    pub async fn submit(&mut self, transport: &dyn EvidenceTransport) -> Result<()> {
        let artifact = match &self.state {
            SessionState::ReviewingArtifact(artifact) => artifact.clone(),
            SessionState::Closed => return Err(SessionError::Closed),
            _ => return Err(SessionError::NotReviewing),
        };

        if artifact.is_empty() && !self.options.allow_empty_upload {
            warn!(
                session_id = %self.id,
                milestone_id = %self.milestone_id,
                "Refusing to upload empty recording"
            );
            return Err(SessionError::EmptyArtifact);
        }

        let milestone_id = self.milestone_id;
        let file_name = evidence_file_name(milestone_id, artifact.content_type(), artifact.captured_at());
        self.transition_to(SessionState::Uploading(artifact.clone()));

        info!(
            session_id = %self.id,
            milestone_id = %milestone_id,
            file_name = %file_name,
            bytes = artifact.len(),
            "Uploading evidence"
        );
        self.events.emit_lossy(StudioEvent::UploadStarted {
            session_id: self.id,
            milestone_id,
            file_name,
            timestamp: time::now(),
        });

        let in_flight = InFlightUpload {
            session_id: self.id,
            milestone_id,
            state: &mut self.state,
            last_transition: &mut self.last_transition,
            events: &self.events,
            armed: true,
        };
        let cancel = self.cancel.clone();
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = transport.upload(milestone_id, &artifact) => Some(result),
        };
        in_flight.settle();

        match outcome {
            Some(Ok(())) => {
                info!(session_id = %self.id, milestone_id = %milestone_id, "Evidence uploaded");
                self.events.emit_lossy(StudioEvent::UploadSucceeded {
                    session_id: self.id,
                    milestone_id,
                    timestamp: time::now(),
                });
                self.close();
                Ok(())
            }
            Some(Err(e)) => {
                warn!(
                    session_id = %self.id,
                    milestone_id = %milestone_id,
                    error = %e,
                    "Evidence upload failed"
                );
                self.transition_to(SessionState::ReviewingArtifact(artifact));
                self.events.emit_lossy(StudioEvent::UploadFailed {
                    session_id: self.id,
                    milestone_id,
                    reason: e.to_string(),
                    timestamp: time::now(),
                });
                Err(e.into())
            }
            None => {
                info!(
                    session_id = %self.id,
                    milestone_id = %milestone_id,
                    "Upload abandoned, evidence state unknown until next fetch"
                );
                self.close();
                Err(SessionError::Cancelled)
            }
        }
    }

    /// Tear down: stop recording, detach the preview, release the device.
    ///
    /// Idempotent; returns whether this call did the teardown.
    pub fn close(&mut self) -> bool {
        if self.state.is_closed() {
            return false;
        }

        if let Some(tap) = self.tap.take() {
            tap.stop();
        }
        self.sink.close();
        self.elapsed.freeze();
        self.preview.detach();
        self.cancel.cancel();

        if self.device.release() {
            self.events.emit_lossy(StudioEvent::DeviceReleased {
                session_id: self.id,
                timestamp: time::now(),
            });
        }

        self.transition_to(SessionState::Closed);
        info!(session_id = %self.id, milestone_id = %self.milestone_id, "Recording session closed");
        self.events.emit_lossy(StudioEvent::SessionClosed {
            session_id: self.id,
            timestamp: time::now(),
        });
        true
    }

    fn transition_to(&mut self, new_state: SessionState) {
        self.last_transition = Some(apply_transition(self.id, &mut self.state, new_state));
    }
}

fn apply_transition(
    session_id: Uuid,
    state: &mut SessionState,
    new_state: SessionState,
) -> StateTransition {
    let transition = StateTransition {
        session_id,
        old_phase: state.phase(),
        new_phase: new_state.phase(),
        transitioned_at: time::now(),
    };
    *state = new_state;

    debug!(
        session_id = %session_id,
        from = %transition.old_phase,
        to = %transition.new_phase,
        "Session transition"
    );
    transition
}

/// Upload in progress on a session's behalf
///
/// If the submit future is dropped before the transport answers, the guard
/// puts the artifact back under review so the session can be resubmitted
/// or retaken.
struct InFlightUpload<'a> {
    session_id: Uuid,
    milestone_id: MilestoneId,
    state: &'a mut SessionState,
    last_transition: &'a mut Option<StateTransition>,
    events: &'a EventBus,
    armed: bool,
}

impl InFlightUpload<'_> {
    /// The upload finished or was cancelled; the caller decides the next state
    fn settle(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightUpload<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let artifact = match &*self.state {
            SessionState::Uploading(artifact) => artifact.clone(),
            _ => return,
        };

        warn!(
            session_id = %self.session_id,
            milestone_id = %self.milestone_id,
            "Upload abandoned by caller, artifact back under review"
        );
        *self.last_transition = Some(apply_transition(
            self.session_id,
            self.state,
            SessionState::ReviewingArtifact(artifact),
        ));
        self.events.emit_lossy(StudioEvent::UploadFailed {
            session_id: self.session_id,
            milestone_id: self.milestone_id,
            reason: "upload abandoned".to_string(),
            timestamp: time::now(),
        });
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for RecordingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSession")
            .field("id", &self.id)
            .field("milestone_id", &self.milestone_id)
            .field("phase", &self.phase())
            .field("device", &self.device)
            .field("elapsed_secs", &self.elapsed.get())
            .finish()
    }
}
