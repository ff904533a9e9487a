//! The grading update path: engine in, storage out.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::DbReviewLog;
use flashback_core::{GradeOutcome, Quality, Sm2};

/// A persisted grading event, with the pre-grade numbers for the caller.
#[derive(Debug)]
pub struct GradedReview {
    pub outcome: GradeOutcome,
    pub interval_before: i64,
    pub ease_before: f64,
}

/// Grade one item and persist the engine's result.
///
/// The engine itself is pure; this function owns the read-compute-write
/// cycle. A write that loses the version race re-reads the row and
/// recomputes once, so two concurrent grades can never both apply to the
/// same snapshot. A second lost race surfaces as a conflict.
pub async fn grade(
    db: &Database,
    scheduler: &Sm2,
    learner_id: Uuid,
    item_id: &str,
    quality: Quality,
    now: DateTime<Utc>,
) -> Result<GradedReview> {
    for attempt in 0..2 {
        let item = db
            .get_review_item(learner_id, item_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("review item {}", item_id)))?;

        let before = item.to_state();
        let outcome = scheduler.grade(&before, quality, now);

        if db
            .update_review_item_state(item.id, item.version, &outcome.new_state)
            .await?
        {
            let log = DbReviewLog {
                id: Uuid::new_v4(),
                review_item_id: item.id,
                learner_id,
                graded_at: now,
                quality: i32::from(quality),
                interval_before: before.interval_days,
                interval_after: outcome.new_state.interval_days,
                ease_before: before.ease_factor,
                ease_after: outcome.new_state.ease_factor,
                status_after: outcome.new_state.status.as_str().to_string(),
                created_at: now,
            };
            db.insert_review_log(&log).await?;

            return Ok(GradedReview {
                interval_before: before.interval_days,
                ease_before: before.ease_factor,
                outcome,
            });
        }

        tracing::debug!("Grade for item {} lost the version race (attempt {})", item_id, attempt);
    }

    Err(ApiError::Conflict(format!(
        "concurrent grade for item {}",
        item_id
    )))
}
