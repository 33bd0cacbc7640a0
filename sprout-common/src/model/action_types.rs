//! Pending actions surfaced by the backend

use serde::{Deserialize, Serialize};

use super::MilestoneId;

/// Kind of caregiver-facing work
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    /// Record video evidence for a milestone
    Video,
    /// Celebratory acknowledgment with no milestone binding
    Generic,
    /// Any other server-declared kind (e.g. a questionnaire)
    Other(String),
}

impl From<String> for ActionKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "video" => ActionKind::Video,
            "generic" => ActionKind::Generic,
            _ => ActionKind::Other(value),
        }
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Video => "video".to_string(),
            ActionKind::Generic => "generic".to_string(),
            ActionKind::Other(value) => value,
        }
    }
}

/// Unit of caregiver work, regenerated on every fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub action_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<MilestoneId>,
}

impl PendingAction {
    /// Record-evidence action bound to a milestone
    pub fn record_evidence(milestone_id: MilestoneId, title: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Video,
            title: title.into(),
            description: String::new(),
            action_label: "Start Recording".to_string(),
            milestone_id: Some(milestone_id),
        }
    }

    /// Display-only acknowledgment
    pub fn generic(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Generic,
            title: title.into(),
            description: description.into(),
            action_label: "View History".to_string(),
            milestone_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_from_wire() {
        let video: PendingAction =
            serde_json::from_str(r#"{"type": "video", "title": "t", "milestone_id": 2}"#).unwrap();
        assert_eq!(video.kind, ActionKind::Video);

        let generic: PendingAction =
            serde_json::from_str(r#"{"type": "generic", "title": "All Caught Up!"}"#).unwrap();
        assert_eq!(generic.kind, ActionKind::Generic);
        assert_eq!(generic.milestone_id, None);

        let other: PendingAction =
            serde_json::from_str(r#"{"type": "survey", "title": "t"}"#).unwrap();
        assert_eq!(other.kind, ActionKind::Other("survey".to_string()));
    }

    #[test]
    fn test_action_kind_serializes_back_to_wire_name() {
        let action = PendingAction::generic("All Caught Up!", "Nothing to do");
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "generic");
        assert!(json.get("milestone_id").is_none());
    }
}
