//! PostgreSQL storage for review items.
//!
//! Pure CRUD: no scheduling arithmetic lives here. The unique constraint on
//! (learner_id, item_id) arbitrates concurrent admissions, and the version
//! column backs the compare-and-swap used when persisting graded state.

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| crate::error::ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Learner Repository ===

    /// Create a new learner with generated token
    pub async fn create_learner(&self, handle: Option<&str>) -> Result<Learner> {
        let token = Uuid::new_v4().to_string();
        let learner = sqlx::query_as::<_, Learner>(
            r#"
            INSERT INTO learners (token, handle)
            VALUES ($1, $2)
            RETURNING id, token, handle, created_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(handle)
        .fetch_one(&self.pool)
        .await?;

        Ok(learner)
    }

    /// Get learner by token
    pub async fn get_learner_by_token(&self, token: &str) -> Result<Option<Learner>> {
        let learner = sqlx::query_as::<_, Learner>(
            r#"
            SELECT id, token, handle, created_at, last_seen_at
            FROM learners
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(learner)
    }

    /// Update learner last_seen_at timestamp
    pub async fn update_last_seen(&self, learner_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE learners
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(learner_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Review Item Repository ===

    /// Insert a new review item unless one already exists for
    /// (learner_id, item_id). Returns None when the unique constraint
    /// swallowed the insert, i.e. another row already holds the pair.
    pub async fn try_insert_review_item(
        &self,
        learner_id: Uuid,
        item_id: &str,
        display_name: &str,
        state: &ReviewState,
    ) -> Result<Option<DbReviewItem>> {
        let item = sqlx::query_as::<_, DbReviewItem>(
            r#"
            INSERT INTO review_items (learner_id, item_id, display_name, status, ease_factor,
                                      interval_days, repetitions, next_review_at, last_reviewed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (learner_id, item_id) DO NOTHING
            RETURNING id, learner_id, item_id, display_name, status, ease_factor,
                      interval_days, repetitions, next_review_at, last_reviewed_at,
                      version, created_at, updated_at
            "#,
        )
        .bind(learner_id)
        .bind(item_id)
        .bind(display_name)
        .bind(state.status.as_str())
        .bind(state.ease_factor)
        .bind(state.interval_days)
        .bind(state.repetitions as i32)
        .bind(state.next_review_at)
        .bind(state.last_reviewed_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Get a review item by (learner, item)
    pub async fn get_review_item(
        &self,
        learner_id: Uuid,
        item_id: &str,
    ) -> Result<Option<DbReviewItem>> {
        let item = sqlx::query_as::<_, DbReviewItem>(
            r#"
            SELECT id, learner_id, item_id, display_name, status, ease_factor,
                   interval_days, repetitions, next_review_at, last_reviewed_at,
                   version, created_at, updated_at
            FROM review_items
            WHERE learner_id = $1 AND item_id = $2
            "#,
        )
        .bind(learner_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Persist a graded state, guarded by the row version.
    /// Returns false when the version no longer matches and nothing was
    /// written; the caller re-reads and decides whether to retry.
    pub async fn update_review_item_state(
        &self,
        id: Uuid,
        expected_version: i64,
        state: &ReviewState,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE review_items
            SET status = $3,
                ease_factor = $4,
                interval_days = $5,
                repetitions = $6,
                next_review_at = $7,
                last_reviewed_at = $8,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(id)
        .bind(expected_version)
        .bind(state.status.as_str())
        .bind(state.ease_factor)
        .bind(state.interval_days)
        .bind(state.repetitions as i32)
        .bind(state.next_review_at)
        .bind(state.last_reviewed_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Reset an existing item for an out-of-cycle review: due now, status
    /// back to reviewing, ease/interval/repetitions untouched. Guarded by
    /// the row version like any other write.
    pub async fn reschedule_item(
        &self,
        id: Uuid,
        expected_version: i64,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE review_items
            SET next_review_at = $3,
                status = 'reviewing',
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(id)
        .bind(expected_version)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get due items for a learner, most overdue first
    pub async fn list_due_items(
        &self,
        learner_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<DbReviewItem>> {
        let items = sqlx::query_as::<_, DbReviewItem>(
            r#"
            SELECT id, learner_id, item_id, display_name, status, ease_factor,
                   interval_days, repetitions, next_review_at, last_reviewed_at,
                   version, created_at, updated_at
            FROM review_items
            WHERE learner_id = $1 AND next_review_at <= $2
            ORDER BY next_review_at
            "#,
        )
        .bind(learner_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Get all items for a learner in the stable listing order
    pub async fn list_all_items(&self, learner_id: Uuid) -> Result<Vec<DbReviewItem>> {
        let items = sqlx::query_as::<_, DbReviewItem>(
            r#"
            SELECT id, learner_id, item_id, display_name, status, ease_factor,
                   interval_days, repetitions, next_review_at, last_reviewed_at,
                   version, created_at, updated_at
            FROM review_items
            WHERE learner_id = $1
            ORDER BY next_review_at
            "#,
        )
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    // === Review Log Repository ===

    /// Insert a grading event record
    pub async fn insert_review_log(&self, log: &DbReviewLog) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO review_log (id, review_item_id, learner_id, graded_at, quality,
                                    interval_before, interval_after, ease_before, ease_after,
                                    status_after)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(log.id)
        .bind(log.review_item_id)
        .bind(log.learner_id)
        .bind(log.graded_at)
        .bind(log.quality)
        .bind(log.interval_before)
        .bind(log.interval_after)
        .bind(log.ease_before)
        .bind(log.ease_after)
        .bind(&log.status_after)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get grading events since a timestamp
    pub async fn get_review_log_since(
        &self,
        learner_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ReviewLogRow>> {
        let rows = match since {
            Some(ts) => {
                sqlx::query_as::<_, ReviewLogRow>(
                    r#"
                    SELECT i.item_id, l.graded_at, l.quality, l.interval_before,
                           l.interval_after, l.ease_before, l.ease_after, l.status_after
                    FROM review_log l
                    JOIN review_items i ON l.review_item_id = i.id
                    WHERE l.learner_id = $1 AND l.graded_at > $2
                    ORDER BY l.graded_at
                    "#,
                )
                .bind(learner_id)
                .bind(ts)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ReviewLogRow>(
                    r#"
                    SELECT i.item_id, l.graded_at, l.quality, l.interval_before,
                           l.interval_after, l.ease_before, l.ease_after, l.status_after
                    FROM review_log l
                    JOIN review_items i ON l.review_item_id = i.id
                    WHERE l.learner_id = $1
                    ORDER BY l.graded_at
                    "#,
                )
                .bind(learner_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    // === Queue Statistics ===

    /// Aggregate queue statistics for a learner
    pub async fn get_queue_stats(
        &self,
        learner_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<QueueStatsResponse> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total_items,
                COUNT(CASE WHEN status = 'learning' THEN 1 END) as learning_items,
                COUNT(CASE WHEN status = 'reviewing' THEN 1 END) as reviewing_items,
                COUNT(CASE WHEN status = 'mastered' THEN 1 END) as mastered_items,
                COUNT(CASE WHEN next_review_at <= $2 THEN 1 END) as due_items,
                COALESCE(AVG(ease_factor), 2.5)::FLOAT8 as average_ease
            FROM review_items
            WHERE learner_id = $1
            "#,
        )
        .bind(learner_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let reviews_today: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM review_log
            WHERE learner_id = $1 AND graded_at >= CURRENT_DATE
            "#,
        )
        .bind(learner_id)
        .fetch_one(&self.pool)
        .await?;

        let retention: Option<f64> = sqlx::query_scalar(
            r#"
            SELECT AVG(CASE WHEN quality >= 3 THEN 1.0 ELSE 0.0 END)::FLOAT8
            FROM review_log
            WHERE learner_id = $1
              AND graded_at >= CURRENT_DATE - INTERVAL '30 days'
            "#,
        )
        .bind(learner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(QueueStatsResponse {
            total_items: row.get("total_items"),
            learning_items: row.get("learning_items"),
            reviewing_items: row.get("reviewing_items"),
            mastered_items: row.get("mastered_items"),
            due_items: row.get("due_items"),
            average_ease: row.get("average_ease"),
            reviews_today,
            retention_rate: retention.unwrap_or(0.0),
        })
    }
}
