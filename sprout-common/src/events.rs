//! Event types for the Sprout capture studio
//!
//! Provides the StudioEvent enum and EventBus shared by the capture crates.
//! Presentation code reads session state directly; these events exist for
//! observers (logging sinks, diagnostics, tests).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::model::MilestoneId;

/// Capture studio event types
///
/// Every event carries the recording session it belongs to so observers can
/// correlate interleaved sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StudioEvent {
    /// Camera/microphone stream acquired
    DeviceAcquired {
        session_id: Uuid,
        /// Whether the relaxed (any camera) constraint was needed
        relaxed: bool,
        timestamp: DateTime<Utc>,
    },

    /// Device stream released (exactly once per acquisition)
    DeviceReleased {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// Recording began
    RecordingStarted {
        session_id: Uuid,
        milestone_id: MilestoneId,
        timestamp: DateTime<Utc>,
    },

    /// Recording finalized into an artifact
    RecordingStopped {
        session_id: Uuid,
        milestone_id: MilestoneId,
        /// Artifact size in bytes
        bytes: u64,
        /// Artifact content type
        content_type: String,
        /// Frozen elapsed-time counter (seconds)
        elapsed_secs: u64,
        timestamp: DateTime<Utc>,
    },

    /// Artifact discarded by a retake
    ArtifactDiscarded {
        session_id: Uuid,
        milestone_id: MilestoneId,
        timestamp: DateTime<Utc>,
    },

    /// Evidence upload began
    UploadStarted {
        session_id: Uuid,
        milestone_id: MilestoneId,
        file_name: String,
        timestamp: DateTime<Utc>,
    },

    /// Evidence accepted by the backend
    UploadSucceeded {
        session_id: Uuid,
        milestone_id: MilestoneId,
        timestamp: DateTime<Utc>,
    },

    /// Evidence upload failed; the session is back in review
    UploadFailed {
        session_id: Uuid,
        milestone_id: MilestoneId,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// Session torn down
    SessionClosed {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

impl StudioEvent {
    /// Session the event belongs to
    pub fn session_id(&self) -> Uuid {
        match self {
            StudioEvent::DeviceAcquired { session_id, .. }
            | StudioEvent::DeviceReleased { session_id, .. }
            | StudioEvent::RecordingStarted { session_id, .. }
            | StudioEvent::RecordingStopped { session_id, .. }
            | StudioEvent::ArtifactDiscarded { session_id, .. }
            | StudioEvent::UploadStarted { session_id, .. }
            | StudioEvent::UploadSucceeded { session_id, .. }
            | StudioEvent::UploadFailed { session_id, .. }
            | StudioEvent::SessionClosed { session_id, .. } => *session_id,
        }
    }
}

/// Broadcast bus for StudioEvents
///
/// Cloning is cheap; all clones share the same channel.
///
/// # Examples
///
/// ```
/// use sprout_common::events::{EventBus, StudioEvent};
///
/// let bus = EventBus::new(16);
/// let mut rx = bus.subscribe();
/// let session_id = uuid::Uuid::new_v4();
///
/// bus.emit_lossy(StudioEvent::SessionClosed {
///     session_id,
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert_eq!(rx.try_recv().unwrap().session_id(), session_id);
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StudioEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per receiver
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<StudioEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: StudioEvent,
    ) -> Result<usize, broadcast::error::SendError<StudioEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: StudioEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers_is_err() {
        let bus = EventBus::new(4);
        let result = bus.emit(StudioEvent::SessionClosed {
            session_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        });
        assert!(result.is_err());
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.capacity(), 4);
    }

    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let session_id = Uuid::new_v4();

        bus.emit_lossy(StudioEvent::DeviceAcquired {
            session_id,
            relaxed: false,
            timestamp: Utc::now(),
        });
        bus.emit_lossy(StudioEvent::DeviceReleased {
            session_id,
            timestamp: Utc::now(),
        });

        assert!(matches!(rx.recv().await.unwrap(), StudioEvent::DeviceAcquired { .. }));
        assert!(matches!(rx.recv().await.unwrap(), StudioEvent::DeviceReleased { .. }));
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = StudioEvent::UploadFailed {
            session_id: Uuid::nil(),
            milestone_id: MilestoneId(7),
            reason: "timeout".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "UploadFailed");
        assert_eq!(json["milestone_id"], 7);
    }
}
