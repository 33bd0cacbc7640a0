//! Visual progression path
//!
//! Nodes keep the server's milestone order exactly; the path is never
//! re-sorted by lifecycle state.

use serde::Serialize;
use sprout_common::model::{ChildId, Milestone, MilestoneId, MilestoneState};

use crate::navigation::Navigation;
use crate::season::SeasonLabel;

/// Badge icon for a lifecycle state
pub fn state_badge(state: MilestoneState) -> &'static str {
    match state {
        MilestoneState::Won => "🏆",
        MilestoneState::Locked => "🔒",
        MilestoneState::Review => "⏳",
        MilestoneState::Active => "⭐",
    }
}

/// Corner tag shown on a card, if any
pub fn state_tag(state: MilestoneState) -> Option<&'static str> {
    match state {
        MilestoneState::Active => Some("Pending"),
        MilestoneState::Review => Some("In Review"),
        MilestoneState::Locked | MilestoneState::Won => None,
    }
}

/// One card on the progression path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathNode {
    /// Position in the server-provided sequence
    pub position: usize,
    pub milestone: Milestone,
    pub badge: &'static str,
    pub tag: Option<&'static str>,
    /// ACTIVE nodes open the capture flow when selected
    pub selectable: bool,
    /// First ACTIVE node on the path
    pub primary: bool,
    pub season: SeasonLabel,
}

impl PathNode {
    pub fn id(&self) -> MilestoneId {
        self.milestone.id
    }

    pub fn state(&self) -> MilestoneState {
        self.milestone.state
    }

    /// Capture navigation for a selectable node; `None` for every other state
    pub fn select(&self, child_id: ChildId) -> Option<Navigation> {
        self.selectable.then(|| Navigation::Capture {
            child_id,
            milestone_id: self.milestone.id,
        })
    }
}

/// Ordered path of milestones
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressPath {
    nodes: Vec<PathNode>,
}

impl ProgressPath {
    pub(crate) fn new(nodes: Vec<PathNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: MilestoneId) -> Option<&PathNode> {
        self.nodes.iter().find(|node| node.milestone.id == id)
    }

    /// Node driving the primary action, if any milestone is ACTIVE
    pub fn primary(&self) -> Option<&PathNode> {
        self.nodes.iter().find(|node| node.primary)
    }

    /// Nodes in a given state, in path order
    pub fn in_state(&self, state: MilestoneState) -> impl Iterator<Item = &PathNode> {
        self.nodes.iter().filter(move |node| node.milestone.state == state)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathNode> {
        self.nodes.iter()
    }
}

impl<'a> IntoIterator for &'a ProgressPath {
    type Item = &'a PathNode;
    type IntoIter = std::slice::Iter<'a, PathNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
