//! Wire model of the child snapshot served by the backend
//!
//! Everything here is an immutable snapshot of server-owned state. The client
//! never mutates these records; after a successful evidence upload it
//! re-fetches the whole snapshot instead.

mod action_types;
mod child_types;
mod milestone_types;
mod timeline_types;

pub use action_types::{ActionKind, PendingAction};
pub use child_types::{ChildId, ChildSnapshot, ChildSummary, RiskStatus};
pub use milestone_types::{parse_leading_int, Milestone, MilestoneId, MilestoneState};
pub use timeline_types::{EvidenceStatus, TimelineEvent};

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT_JSON: &str = r#"{
        "child": {
            "id": "3f1f1d9e-8a57-4d51-9c55-0d3f3e0b6a11",
            "name": "Arjun",
            "age": "11 months",
            "birth_date": "2023-01-15",
            "status": "green"
        },
        "timeline": [
            {
                "type": "milestone_won",
                "title": "In Review: Sitting",
                "date": "2023-12-01",
                "icon": "⏳",
                "description": "Status: AI Analyzing...",
                "evidence_url": "http://127.0.0.1:8000/media/milestone_evidence/a.webm",
                "status": "SUBMITTED"
            },
            {
                "type": "milestone",
                "title": "Joined",
                "date": "2023-02-01T09:30:00.123456Z",
                "icon": "👋",
                "description": "Registration complete"
            }
        ],
        "milestones": [
            {"id": 1, "title": "Holds head", "description": "Holds head steady", "state": "WON", "expected_age": "3 months"},
            {"id": 2, "title": "Crawling", "description": "Crawls on hands", "state": "ACTIVE", "expected_age": "9 months"},
            {"id": 3, "title": "Walking", "description": "Walks alone", "state": "LOCKED", "expected_age": "12 months"}
        ],
        "pending_actions": [
            {"type": "video", "title": "Record crawling", "description": "Is Arjun crawling?", "action_label": "Start Recording", "milestone_id": 2}
        ]
    }"#;

    #[test]
    fn test_snapshot_parses_full_payload() {
        let snapshot: ChildSnapshot = serde_json::from_str(SNAPSHOT_JSON).unwrap();

        assert_eq!(snapshot.child.name, "Arjun");
        assert_eq!(
            snapshot.child.birth_date,
            chrono::NaiveDate::from_ymd_opt(2023, 1, 15)
        );
        assert_eq!(snapshot.child.status, RiskStatus::Green);
        assert_eq!(snapshot.milestones.len(), 3);
        assert_eq!(snapshot.milestones[1].state, MilestoneState::Active);
        assert_eq!(snapshot.milestones[1].expected_age_months(), 9);
        assert_eq!(snapshot.pending_actions.len(), 1);
        assert_eq!(snapshot.pending_actions[0].kind, ActionKind::Video);
        assert_eq!(snapshot.pending_actions[0].milestone_id, Some(MilestoneId(2)));
        assert_eq!(snapshot.timeline[0].status, Some(EvidenceStatus::Submitted));
        assert_eq!(
            snapshot.timeline[1].date,
            chrono::NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()
        );
    }

    #[test]
    fn test_snapshot_without_pending_actions_defaults_to_empty() {
        let json = r#"{
            "child": {"id": "3f1f1d9e-8a57-4d51-9c55-0d3f3e0b6a11", "name": "Mia"},
            "timeline": [],
            "milestones": []
        }"#;
        let snapshot: ChildSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.pending_actions.is_empty());
        assert!(snapshot.child.birth_date.is_none());
        assert_eq!(snapshot.child.status, RiskStatus::Unknown);
    }
}
