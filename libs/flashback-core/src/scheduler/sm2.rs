//! SM-2 spaced repetition variant.
//!
//! Based on SuperMemo 2 with configurable parameters. The engine is a pure
//! function of (state, quality, now); callers persist the result.

use super::GradeOutcome;
use crate::types::{ItemStatus, Quality, ReviewState};
use chrono::{DateTime, Duration, Utc};

/// SM-2 engine with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    /// Interval after the first success of a training cycle.
    pub first_interval: i64,
    /// Interval after the second consecutive success.
    pub second_interval: i64,
    /// Interval after any failed recall.
    pub failure_interval: i64,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            first_interval: 3,
            second_interval: 6,
            failure_interval: 1,
        }
    }
}

impl Sm2 {
    /// State for a freshly admitted item: immediately due, never reviewed.
    pub fn initial_state(&self, now: DateTime<Utc>) -> ReviewState {
        ReviewState {
            status: ItemStatus::Learning,
            ease_factor: self.initial_ease,
            interval_days: 0,
            repetitions: 0,
            next_review_at: now,
            last_reviewed_at: None,
        }
    }

    /// Apply one grading event.
    ///
    /// The first two successes of a cycle use fixed intervals; the ease
    /// factor only drives growth from the third success onward. The
    /// multiplicative step uses the pre-update ease factor, and the 1.3
    /// floor is applied after the full ease update. Failures reset the
    /// cycle but leave the ease factor untouched.
    pub fn grade(&self, state: &ReviewState, quality: Quality, now: DateTime<Utc>) -> GradeOutcome {
        let (new_status, new_interval, new_ease, new_repetitions) = if quality.is_success() {
            let interval = match state.repetitions {
                0 => self.first_interval,
                1 => self.second_interval,
                _ => (state.interval_days as f64 * state.ease_factor).round() as i64,
            };
            let q = quality.value() as f64;
            let ease = (state.ease_factor + 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02))
                .max(self.minimum_ease);
            let status = if quality.is_strong() {
                ItemStatus::Mastered
            } else {
                ItemStatus::Reviewing
            };
            (status, interval, ease, state.repetitions + 1)
        } else {
            // quality < 4 here, so a failure can never land in Mastered
            (
                ItemStatus::Reviewing,
                self.failure_interval,
                state.ease_factor,
                0,
            )
        };

        let next_due = now + Duration::days(new_interval);

        GradeOutcome {
            new_state: ReviewState {
                status: new_status,
                ease_factor: new_ease,
                interval_days: new_interval,
                repetitions: new_repetitions,
                next_review_at: next_due,
                last_reviewed_at: Some(now),
            },
            next_due,
        }
    }
}
