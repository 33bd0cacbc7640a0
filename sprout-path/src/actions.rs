//! Prioritized action queue
//!
//! Server-declared pending actions keep the order they were received in.
//! Only when the server declares none is the queue derived locally from the
//! ACTIVE milestones on the path.

use serde::Serialize;
use sprout_common::model::{ActionKind, ChildId, MilestoneId, PendingAction};
use tracing::warn;

use crate::navigation::Navigation;
use crate::path::ProgressPath;

/// Icon for an action kind
pub fn action_icon(kind: &ActionKind) -> &'static str {
    match kind {
        ActionKind::Video => "🎥",
        ActionKind::Generic => "🎉",
        ActionKind::Other(_) => "📝",
    }
}

/// Where a queued action came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOrigin {
    Server,
    Derived,
}

/// One entry of the action queue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueuedAction {
    pub action: PendingAction,
    pub icon: &'static str,
    pub origin: ActionOrigin,
    /// Milestone the action opens capture for; `None` means display-only
    pub target: Option<MilestoneId>,
}

impl QueuedAction {
    fn new(action: PendingAction, origin: ActionOrigin) -> Self {
        let target = match (&action.kind, action.milestone_id) {
            (ActionKind::Generic, _) => None,
            (_, Some(id)) => Some(id),
            (kind, None) => {
                warn!(
                    kind = ?kind,
                    title = %action.title,
                    "Pending action has no milestone binding, treating as display-only"
                );
                None
            }
        };

        Self {
            icon: action_icon(&action.kind),
            action,
            origin,
            target,
        }
    }

    pub fn is_navigable(&self) -> bool {
        self.target.is_some()
    }
}

/// Ordered, caregiver-facing work list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionQueue {
    child_id: Option<ChildId>,
    entries: Vec<QueuedAction>,
}

impl ActionQueue {
    /// Queue from server-declared actions, order preserved
    pub fn from_server(child_id: ChildId, actions: &[PendingAction]) -> Self {
        Self {
            child_id: Some(child_id),
            entries: actions
                .iter()
                .cloned()
                .map(|action| QueuedAction::new(action, ActionOrigin::Server))
                .collect(),
        }
    }

    /// Queue derived from the path: one record-evidence action per ACTIVE
    /// milestone, or a single acknowledgment when none are ACTIVE.
    pub fn derive(child_id: ChildId, child_name: &str, path: &ProgressPath) -> Self {
        let mut entries: Vec<QueuedAction> = path
            .iter()
            .filter(|node| node.milestone.state.is_actionable())
            .map(|node| {
                let milestone = &node.milestone;
                let mut action = PendingAction::record_evidence(
                    milestone.id,
                    format!("Verify '{}'", milestone.title),
                );
                action.description = if milestone.description.is_empty() {
                    "Record a video for review.".to_string()
                } else {
                    format!(
                        "Is {} {}? Record a video for review.",
                        child_name,
                        milestone.description.to_lowercase()
                    )
                };
                QueuedAction::new(action, ActionOrigin::Derived)
            })
            .collect();

        if entries.is_empty() {
            entries.push(QueuedAction::new(
                PendingAction::generic(
                    "All Caught Up!",
                    format!("{} is doing great. No pending actions.", child_name),
                ),
                ActionOrigin::Derived,
            ));
        }

        Self {
            child_id: Some(child_id),
            entries,
        }
    }

    pub fn entries(&self) -> &[QueuedAction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First navigable entry
    pub fn primary(&self) -> Option<&QueuedAction> {
        self.entries.iter().find(|entry| entry.is_navigable())
    }

    /// Select the entry at `index`.
    ///
    /// Bound actions navigate to capture for their milestone; display-only
    /// actions and out-of-range indices yield `None`.
    pub fn select(&self, index: usize) -> Option<Navigation> {
        let child_id = self.child_id?;
        let entry = self.entries.get(index)?;
        entry.target.map(|milestone_id| Navigation::Capture {
            child_id,
            milestone_id,
        })
    }
}
