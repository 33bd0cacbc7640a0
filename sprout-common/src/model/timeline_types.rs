//! Historical timeline events

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::MilestoneId;

/// Review status of submitted evidence, as reported on timeline entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceStatus {
    Pending,
    Submitted,
    AiReviewed,
    Completed,
    Rejected,
    #[serde(other)]
    Unknown,
}

/// Read-only history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Milestone the entry refers to, when the backend includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MilestoneId>,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    /// Calendar day of the event; date-times are truncated to their date
    #[serde(deserialize_with = "deserialize_event_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EvidenceStatus>,
}

fn deserialize_event_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_event_date(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized date: {}", text)))
}

/// Accepts `YYYY-MM-DD`, RFC 3339 date-times and naive ISO date-times
fn parse_event_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.date_naive());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|stamp| stamp.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_event_date("2024-03-09"), expected);
        assert_eq!(parse_event_date("2024-03-09T22:10:00Z"), expected);
        assert_eq!(parse_event_date("2024-03-09T22:10:00.5+05:30"), expected);
        assert_eq!(parse_event_date("2024-03-09T22:10:00.123456"), expected);
        assert_eq!(parse_event_date("yesterday"), None);
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let json = r#"{"type": "milestone_won", "title": "t", "date": "2024-03-09", "status": "ESCALATED"}"#;
        let event: TimelineEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.status, Some(EvidenceStatus::Unknown));
    }

    #[test]
    fn test_ai_reviewed_wire_name() {
        let status: EvidenceStatus = serde_json::from_str("\"AI_REVIEWED\"").unwrap();
        assert_eq!(status, EvidenceStatus::AiReviewed);
    }
}
