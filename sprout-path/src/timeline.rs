//! Read-only activity timeline

use serde::Serialize;
use sprout_common::model::{EvidenceStatus, MilestoneId, TimelineEvent};

/// Timeline event with its presentation affordances
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub event: TimelineEvent,
    /// Evidence video can be played back
    pub viewable: bool,
    /// Administrative "force completion" may be offered for this entry
    pub review_override: bool,
}

impl TimelineEntry {
    pub fn new(event: TimelineEvent) -> Self {
        let viewable = event.evidence_url.is_some();
        let review_override = viewable && event.status != Some(EvidenceStatus::Completed);
        Self {
            event,
            viewable,
            review_override,
        }
    }

    /// Milestone targeted by a review override, when the backend names one
    pub fn override_target(&self) -> Option<MilestoneId> {
        if self.review_override {
            self.event.id
        } else {
            None
        }
    }
}

/// Wrap events, keeping the server's (newest-first) order
pub fn timeline_entries(events: &[TimelineEvent]) -> Vec<TimelineEntry> {
    events.iter().cloned().map(TimelineEntry::new).collect()
}
