//! Core types for the review scheduler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GradeError;

/// Lifecycle status of a tracked item.
///
/// `Learning` is the creation state and is never re-entered: the first
/// grading event moves the item to `Reviewing` or `Mastered`, and every
/// later grade keeps it oscillating between those two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Learning,
    Reviewing,
    Mastered,
}

impl Default for ItemStatus {
    fn default() -> Self {
        Self::Learning
    }
}

impl ItemStatus {
    /// Stable string form used by storage layers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Learning => "learning",
            Self::Reviewing => "reviewing",
            Self::Mastered => "mastered",
        }
    }

    /// Parse from the stable string form.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "learning" => Some(Self::Learning),
            "reviewing" => Some(Self::Reviewing),
            "mastered" => Some(Self::Mastered),
            _ => None,
        }
    }
}

/// Validated 0-5 recall grade.
///
/// Out-of-range values are rejected at construction, never clamped; a
/// clamped grade would feed the wrong delta into the ease update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quality(u8);

impl Quality {
    /// Validate a raw grade.
    pub fn new(value: i32) -> Result<Self, GradeError> {
        if (0..=5).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(GradeError::InvalidQuality { value })
        }
    }

    /// Numeric value (0-5).
    pub fn value(self) -> u8 {
        self.0
    }

    /// A grade of 3 or better counts as a successful recall.
    pub fn is_success(self) -> bool {
        self.0 >= 3
    }

    /// A grade of 4 or better marks the item mastered.
    pub fn is_strong(self) -> bool {
        self.0 >= 4
    }
}

impl TryFrom<i32> for Quality {
    type Error = GradeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for i32 {
    fn from(quality: Quality) -> Self {
        quality.0 as i32
    }
}

/// Scheduling state of one tracked item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub status: ItemStatus,
    /// Retention multiplier, floored at the scheduler's minimum (1.3).
    pub ease_factor: f64,
    /// Days until the next review. 0 until the first grading event,
    /// at least 1 afterwards.
    pub interval_days: i64,
    /// Consecutive successful reviews; reset to 0 by any failure.
    pub repetitions: u32,
    pub next_review_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl ReviewState {
    /// Whether the item is due for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn quality_accepts_full_range() {
        for value in 0..=5 {
            assert_eq!(Quality::new(value).unwrap().value(), value as u8);
        }
    }

    #[test]
    fn quality_rejects_out_of_range() {
        for value in [-1, 6, 100, i32::MIN] {
            assert_eq!(
                Quality::new(value),
                Err(GradeError::InvalidQuality { value })
            );
        }
    }

    #[test]
    fn quality_thresholds() {
        assert!(!Quality::new(2).unwrap().is_success());
        assert!(Quality::new(3).unwrap().is_success());
        assert!(!Quality::new(3).unwrap().is_strong());
        assert!(Quality::new(4).unwrap().is_strong());
    }

    #[test]
    fn status_string_round_trip() {
        for status in [
            ItemStatus::Learning,
            ItemStatus::Reviewing,
            ItemStatus::Mastered,
        ] {
            assert_eq!(ItemStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(ItemStatus::from_str("new"), None);
    }
}
