//! Seasonal labeling of milestones
//!
//! Each milestone is placed on the calendar at `birth date + expected age`
//! and bucketed into one of four fixed quarters for display. This is a pure
//! function of its inputs: nothing is stored, and identical inputs always
//! give identical labels.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

/// Label used when no calendar date can be computed
pub const PLACEHOLDER_LABEL: &str = "---";

/// Three-month display bucket
///
/// Months are zero-based (January = 0):
/// - Winter: 11, 0, 1
/// - Spring: 2–4
/// - Summer: 5–7
/// - Autumn: 8–10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quarter {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Quarter {
    /// All quarters in display order
    pub const ALL: [Quarter; 4] = [
        Quarter::Winter,
        Quarter::Spring,
        Quarter::Summer,
        Quarter::Autumn,
    ];

    /// Bucket a zero-based month index. Total: indices ≥ 12 wrap.
    pub fn from_month0(month0: u32) -> Self {
        match month0 % 12 {
            11 | 0 | 1 => Quarter::Winter,
            2..=4 => Quarter::Spring,
            5..=7 => Quarter::Summer,
            _ => Quarter::Autumn,
        }
    }

    /// Stable display ordering (Winter = 0 … Autumn = 3)
    pub fn ordinal(self) -> u8 {
        match self {
            Quarter::Winter => 0,
            Quarter::Spring => 1,
            Quarter::Summer => 2,
            Quarter::Autumn => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Quarter::Winter => "winter",
            Quarter::Spring => "spring",
            Quarter::Summer => "summer",
            Quarter::Autumn => "autumn",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Quarter::Winter => "❄️",
            Quarter::Spring => "🌱",
            Quarter::Summer => "☀️",
            Quarter::Autumn => "🍂",
        }
    }

    /// Colour theme tag for presenters
    pub fn theme(self) -> &'static str {
        match self {
            Quarter::Winter => "sky",
            Quarter::Spring => "emerald",
            Quarter::Summer => "amber",
            Quarter::Autumn => "orange",
        }
    }
}

impl std::fmt::Display for Quarter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Display metadata for one milestone's place on the calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonLabel {
    /// "Dec 2023", or [`PLACEHOLDER_LABEL`]
    pub label: String,
    /// `None` only for the placeholder
    pub quarter: Option<Quarter>,
    /// Computed calendar date, if any
    pub date: Option<NaiveDate>,
}

impl SeasonLabel {
    pub fn placeholder() -> Self {
        Self {
            label: PLACEHOLDER_LABEL.to_string(),
            quarter: None,
            date: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.quarter.is_none()
    }

    /// Quarter icon, empty for the placeholder
    pub fn icon(&self) -> &'static str {
        self.quarter.map(Quarter::icon).unwrap_or("")
    }
}

/// Compute the season label for a milestone expected `offset_months` after birth.
///
/// A missing birth date, or an offset that leaves the representable calendar,
/// degrades to the placeholder label.
pub fn season_label(birth_date: Option<NaiveDate>, offset_months: i64) -> SeasonLabel {
    let Some(birth_date) = birth_date else {
        return SeasonLabel::placeholder();
    };

    match add_months_rolling(birth_date, offset_months) {
        Some(date) => SeasonLabel {
            label: date.format("%b %Y").to_string(),
            quarter: Some(Quarter::from_month0(date.month0())),
            date: Some(date),
        },
        None => {
            tracing::debug!(
                birth_date = %birth_date,
                offset_months,
                "Season date out of range, using placeholder"
            );
            SeasonLabel::placeholder()
        }
    }
}

/// Add calendar months, rolling day overflow into the following month.
///
/// Jan 31 + 1 month is Mar 3 (Mar 2 in a leap year) rather than being clamped
/// to the end of February. Negative offsets move backwards.
pub fn add_months_rolling(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let absolute = i64::from(date.year())
        .checked_mul(12)?
        .checked_add(i64::from(date.month0()))?
        .checked_add(months)?;

    let year = i32::try_from(absolute.div_euclid(12)).ok()?;
    let month = absolute.rem_euclid(12) as u32 + 1;

    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(date.day0())))
}
