//! Navigation intents produced by selecting path nodes or queued actions

use serde::Serialize;
use sprout_common::model::{ChildId, MilestoneId};

/// Where the UI should go next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "to", rename_all = "snake_case")]
pub enum Navigation {
    /// Open the evidence capture flow for a milestone
    Capture {
        child_id: ChildId,
        milestone_id: MilestoneId,
    },
}

impl Navigation {
    /// Route path for the capture screen (`/caregiver/child/{id}/record?milestone_id={m}`)
    pub fn route(&self) -> String {
        match self {
            Navigation::Capture {
                child_id,
                milestone_id,
            } => format!("/caregiver/child/{}/record?milestone_id={}", child_id, milestone_id),
        }
    }

    pub fn milestone_id(&self) -> MilestoneId {
        match self {
            Navigation::Capture { milestone_id, .. } => *milestone_id,
        }
    }
}
