//! Child identity and the full snapshot payload

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{Milestone, PendingAction, TimelineEvent};

/// Child identifier (server-assigned UUID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildId(pub Uuid);

impl std::fmt::Display for ChildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ChildId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(ChildId)
    }
}

/// Traffic-light screening status computed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskStatus {
    Green,
    Amber,
    Red,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Child header as served in the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildSummary {
    pub id: ChildId,
    pub name: String,
    /// Display age, already formatted by the backend ("11 months", "2 yrs 3 mo")
    #[serde(default)]
    pub age: String,
    /// Missing, null and empty-string birth dates all become `None`
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: RiskStatus,
}

/// `GET child-snapshot(childId)` response; the sole input of the resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildSnapshot {
    pub child: ChildSummary,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub pending_actions: Vec<PendingAction>,
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
