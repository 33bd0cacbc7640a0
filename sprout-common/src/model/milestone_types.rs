//! Milestone records and their lifecycle state

use serde::{Deserialize, Deserializer, Serialize};

/// Milestone identifier (server-assigned child-milestone row id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilestoneId(pub i64);

impl std::fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MilestoneId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(MilestoneId)
    }
}

/// Progression gate of a milestone, computed by the backend
///
/// - `Locked`: child is too young; shown greyed out, never actionable
/// - `Active`: evidence is wanted; the only actionable state
/// - `Review`: evidence submitted, waiting on human judgment
/// - `Won`: completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MilestoneState {
    Locked,
    Active,
    Review,
    Won,
}

impl MilestoneState {
    /// Whether selecting a milestone in this state opens the capture flow
    pub fn is_actionable(self) -> bool {
        matches!(self, MilestoneState::Active)
    }
}

impl std::fmt::Display for MilestoneState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MilestoneState::Locked => write!(f, "LOCKED"),
            MilestoneState::Active => write!(f, "ACTIVE"),
            MilestoneState::Review => write!(f, "REVIEW"),
            MilestoneState::Won => write!(f, "WON"),
        }
    }
}

/// One developmental milestone as served in the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub state: MilestoneState,
    /// Expected age as the backend formats it, e.g. "11 months"
    #[serde(default, deserialize_with = "deserialize_age_text")]
    pub expected_age: String,
}

impl Milestone {
    /// Expected age offset from birth, in months.
    ///
    /// Taken from the leading integer of `expected_age`; text without one
    /// yields 0.
    pub fn expected_age_months(&self) -> i64 {
        parse_leading_int(&self.expected_age).unwrap_or(0)
    }
}

/// Parse an optionally signed integer prefix ("11 months" → 11, " -2x" → -2).
///
/// Returns `None` when no digits lead the text or the value overflows `i64`.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Accept the expected age either as display text or as a bare month count
fn deserialize_age_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AgeText {
        Text(String),
        Months(i64),
    }

    Ok(match Option::<AgeText>::deserialize(deserializer)? {
        Some(AgeText::Text(text)) => text,
        Some(AgeText::Months(months)) => format!("{} months", months),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("11 months"), Some(11));
        assert_eq!(parse_leading_int("  7"), Some(7));
        assert_eq!(parse_leading_int("-3 weeks"), Some(-3));
        assert_eq!(parse_leading_int("+4"), Some(4));
        assert_eq!(parse_leading_int("months"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("99999999999999999999999"), None);
    }

    #[test]
    fn test_expected_age_months_defaults_to_zero() {
        let milestone = Milestone {
            id: MilestoneId(1),
            title: "Smiles".to_string(),
            description: String::new(),
            state: MilestoneState::Won,
            expected_age: "soon".to_string(),
        };
        assert_eq!(milestone.expected_age_months(), 0);
    }

    #[test]
    fn test_expected_age_accepts_bare_number() {
        let json = r#"{"id": 4, "title": "Babbles", "state": "LOCKED", "expected_age": 6}"#;
        let milestone: Milestone = serde_json::from_str(json).unwrap();
        assert_eq!(milestone.expected_age, "6 months");
        assert_eq!(milestone.expected_age_months(), 6);
    }

    #[test]
    fn test_state_wire_names() {
        for (text, state) in [
            ("\"LOCKED\"", MilestoneState::Locked),
            ("\"ACTIVE\"", MilestoneState::Active),
            ("\"REVIEW\"", MilestoneState::Review),
            ("\"WON\"", MilestoneState::Won),
        ] {
            let parsed: MilestoneState = serde_json::from_str(text).unwrap();
            assert_eq!(parsed, state);
            assert_eq!(format!("\"{}\"", state), text);
        }
        assert!(serde_json::from_str::<MilestoneState>("\"DONE\"").is_err());
    }

    #[test]
    fn test_only_active_is_actionable() {
        assert!(MilestoneState::Active.is_actionable());
        assert!(!MilestoneState::Locked.is_actionable());
        assert!(!MilestoneState::Review.is_actionable());
        assert!(!MilestoneState::Won.is_actionable());
    }
}
