//! Due queries over the review item store.
//!
//! Read-only; `now` is threaded in from the caller so due-ness is
//! deterministic under test.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::Database;
use crate::error::Result;
use crate::models::{ReviewItemView, ReviewItemWithDue};

/// Items whose next review has arrived, most overdue first.
pub async fn list_due(
    db: &Database,
    learner_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<ReviewItemView>> {
    let items = db.list_due_items(learner_id, now).await?;
    Ok(items.iter().map(|item| item.to_view()).collect())
}

/// Every tracked item with its due flag, ascending by next review time.
pub async fn list_all(
    db: &Database,
    learner_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<ReviewItemWithDue>> {
    let items = db.list_all_items(learner_id).await?;
    Ok(items
        .iter()
        .map(|item| ReviewItemWithDue {
            is_due: item.to_state().is_due(now),
            item: item.to_view(),
        })
        .collect())
}
