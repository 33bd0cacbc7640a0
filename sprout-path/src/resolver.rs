//! Milestone Progression Resolver
//!
//! Deterministic projection of one child snapshot into the structures the UI
//! renders: the ordered path, the action queue, seasonal labels and the
//! timeline. No I/O and no mutation; calling it twice on the same input gives
//! equal output.

use chrono::NaiveDate;
use serde::Serialize;
use sprout_common::model::{
    ChildId, ChildSnapshot, ChildSummary, Milestone, MilestoneState, PendingAction, TimelineEvent,
};
use tracing::debug;

use crate::actions::ActionQueue;
use crate::path::{state_badge, state_tag, PathNode, ProgressPath};
use crate::season::{season_label, SeasonLabel};
use crate::timeline::{timeline_entries, TimelineEntry};

/// Child-scoped context passed explicitly into the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildContext {
    pub child_id: ChildId,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
}

impl From<&ChildSummary> for ChildContext {
    fn from(child: &ChildSummary) -> Self {
        Self {
            child_id: child.id,
            name: child.name.clone(),
            birth_date: child.birth_date,
        }
    }
}

/// Resolver output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progression {
    pub ordered_path: ProgressPath,
    pub action_queue: ActionQueue,
    /// One label per path node, same order as `ordered_path`
    pub seasonal_labels: Vec<SeasonLabel>,
    pub timeline: Vec<TimelineEntry>,
}

impl Progression {
    pub fn seasonal_label(&self, position: usize) -> Option<&SeasonLabel> {
        self.seasonal_labels.get(position)
    }
}

/// Resolve a fetched snapshot
pub fn resolve_snapshot(snapshot: &ChildSnapshot) -> Progression {
    resolve(
        &ChildContext::from(&snapshot.child),
        &snapshot.milestones,
        &snapshot.pending_actions,
        &snapshot.timeline,
    )
}

/// Project milestones, pending actions and timeline into a [`Progression`]
pub fn resolve(
    context: &ChildContext,
    milestones: &[Milestone],
    pending_actions: &[PendingAction],
    timeline: &[TimelineEvent],
) -> Progression {
    let primary_index = milestones
        .iter()
        .position(|m| m.state == MilestoneState::Active);

    let nodes: Vec<PathNode> = milestones
        .iter()
        .enumerate()
        .map(|(position, milestone)| PathNode {
            position,
            badge: state_badge(milestone.state),
            tag: state_tag(milestone.state),
            selectable: milestone.state.is_actionable(),
            primary: Some(position) == primary_index,
            season: season_label(context.birth_date, milestone.expected_age_months()),
            milestone: milestone.clone(),
        })
        .collect();

    let seasonal_labels = nodes.iter().map(|node| node.season.clone()).collect();
    let ordered_path = ProgressPath::new(nodes);

    let action_queue = if pending_actions.is_empty() {
        debug!(
            child_id = %context.child_id,
            "No server pending actions, deriving queue from path"
        );
        ActionQueue::derive(context.child_id, &context.name, &ordered_path)
    } else {
        ActionQueue::from_server(context.child_id, pending_actions)
    };

    let active = ordered_path.in_state(MilestoneState::Active).count();
    debug!(
        child_id = %context.child_id,
        milestones = ordered_path.len(),
        active,
        actions = action_queue.len(),
        "Resolved progression"
    );

    Progression {
        ordered_path,
        action_queue,
        seasonal_labels,
        timeline: timeline_entries(timeline),
    }
}
