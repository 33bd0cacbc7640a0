//! Recording session states

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capture::Artifact;

/// Recording session state
///
/// `Idle` is the live-preview state entered once the device is held.
/// `ReviewingArtifact` owns the finalized recording until it is retaken or
/// submitted. `Uploading` keeps it so a failed or abandoned upload can hand
/// it back for review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
    ReviewingArtifact(Artifact),
    Uploading(Artifact),
    /// Device released; every further transition is a no-op
    Closed,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::Recording => SessionPhase::Recording,
            SessionState::ReviewingArtifact(_) => SessionPhase::ReviewingArtifact,
            SessionState::Uploading(_) => SessionPhase::Uploading,
            SessionState::Closed => SessionPhase::Closed,
        }
    }

    /// Artifact under review or being uploaded, if any
    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            SessionState::ReviewingArtifact(artifact) | SessionState::Uploading(artifact) => {
                Some(artifact)
            }
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, SessionState::Closed)
    }
}

/// Payload-free view of [`SessionState`] for logging and presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    Idle,
    Recording,
    ReviewingArtifact,
    Uploading,
    Closed,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionPhase::Idle => "IDLE",
            SessionPhase::Recording => "RECORDING",
            SessionPhase::ReviewingArtifact => "REVIEWING_ARTIFACT",
            SessionPhase::Uploading => "UPLOADING",
            SessionPhase::Closed => "CLOSED",
        };
        f.write_str(name)
    }
}

/// Record of one state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    pub session_id: Uuid,
    pub old_phase: SessionPhase,
    pub new_phase: SessionPhase,
    pub transitioned_at: DateTime<Utc>,
}
