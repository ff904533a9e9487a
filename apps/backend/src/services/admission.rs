//! Queue admission: create review items or re-admit tracked ones.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::DbReviewItem;
use flashback_core::Sm2;

/// Outcome of an admission request.
#[derive(Debug)]
pub struct AdmitOutcome {
    pub item: DbReviewItem,
    pub created: bool,
}

/// Admit an item into a learner's review queue.
///
/// A new item starts in `learning` and is immediately due. An
/// already-tracked item is reset for an out-of-cycle review instead: due
/// now, status back to `reviewing`, ease/interval/repetitions untouched.
/// The unique index on (learner_id, item_id) arbitrates concurrent
/// admissions; a lost version race on the reset path is retried once
/// before the conflict is surfaced.
pub async fn admit(
    db: &Database,
    scheduler: &Sm2,
    learner_id: Uuid,
    item_id: &str,
    display_name: &str,
    now: DateTime<Utc>,
) -> Result<AdmitOutcome> {
    if let Some(item) = db
        .try_insert_review_item(
            learner_id,
            item_id,
            display_name,
            &scheduler.initial_state(now),
        )
        .await?
    {
        tracing::info!("Admitted new review item {} for learner {}", item_id, learner_id);
        return Ok(AdmitOutcome {
            item,
            created: true,
        });
    }

    for _ in 0..2 {
        let item = db
            .get_review_item(learner_id, item_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("review item {}", item_id)))?;

        if db.reschedule_item(item.id, item.version, now).await? {
            let mut item = item;
            item.next_review_at = now;
            item.status = "reviewing".to_string();
            item.version += 1;
            tracing::info!("Re-admitted item {} for learner {}", item_id, learner_id);
            return Ok(AdmitOutcome {
                item,
                created: false,
            });
        }
    }

    Err(ApiError::Conflict(format!(
        "concurrent admission for item {}",
        item_id
    )))
}
