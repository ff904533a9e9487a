//! Review scheduling engine.

pub mod sm2;

use chrono::{DateTime, Utc};

use crate::types::ReviewState;

/// Result of grading an item.
#[derive(Debug, Clone)]
pub struct GradeOutcome {
    pub new_state: ReviewState,
    pub next_due: DateTime<Utc>,
}
