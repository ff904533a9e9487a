//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from flashback-core
pub use flashback_core::{GradeOutcome, ItemStatus, Quality, ReviewState};

// === Database Entity Types ===

/// Learner registration info
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Learner {
    pub id: Uuid,
    pub token: String,
    pub handle: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Review item stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReviewItem {
    pub id: Uuid,
    pub learner_id: Uuid,
    pub item_id: String,
    pub display_name: String,
    pub status: String,
    pub ease_factor: f64,
    pub interval_days: i64,
    pub repetitions: i32,
    pub next_review_at: DateTime<Utc>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbReviewItem {
    /// Convert to the core scheduling state
    pub fn to_state(&self) -> ReviewState {
        ReviewState {
            status: ItemStatus::from_str(&self.status).unwrap_or_default(),
            ease_factor: self.ease_factor,
            interval_days: self.interval_days,
            repetitions: self.repetitions.max(0) as u32,
            next_review_at: self.next_review_at,
            last_reviewed_at: self.last_reviewed_at,
        }
    }

    /// Convert to the outbound listing entry
    pub fn to_view(&self) -> ReviewItemView {
        ReviewItemView {
            item_id: self.item_id.clone(),
            display_name: self.display_name.clone(),
            status: ItemStatus::from_str(&self.status).unwrap_or_default(),
            ease_factor: self.ease_factor,
            interval_days: self.interval_days,
            repetitions: self.repetitions,
            next_review_at: self.next_review_at,
            last_reviewed_at: self.last_reviewed_at,
        }
    }
}

/// Grading event record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReviewLog {
    pub id: Uuid,
    pub review_item_id: Uuid,
    pub learner_id: Uuid,
    pub graded_at: DateTime<Utc>,
    pub quality: i32,
    pub interval_before: i64,
    pub interval_after: i64,
    pub ease_before: f64,
    pub ease_after: f64,
    pub status_after: String,
    pub created_at: DateTime<Utc>,
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub handle: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub learner_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LearnerStatusResponse {
    pub learner_id: Uuid,
    pub handle: Option<String>,
    pub last_seen_at: DateTime<Utc>,
}

// Queue types

#[derive(Debug, Serialize, Deserialize)]
pub struct AdmitRequest {
    pub item_id: String,
    pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdmitResponse {
    /// false when an already-tracked item was reset for an
    /// out-of-cycle review instead
    pub created: bool,
    #[serde(flatten)]
    pub item: ReviewItemView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueueStatsResponse {
    pub total_items: i64,
    pub learning_items: i64,
    pub reviewing_items: i64,
    pub mastered_items: i64,
    pub due_items: i64,
    pub average_ease: f64,
    pub reviews_today: i64,
    pub retention_rate: f64,
}

// Review types

/// Outbound listing entry for a tracked item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewItemView {
    pub item_id: String,
    pub display_name: String,
    pub status: ItemStatus,
    pub ease_factor: f64,
    pub interval_days: i64,
    pub repetitions: i32,
    pub next_review_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

/// Listing entry with due-ness computed against the request time
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewItemWithDue {
    pub is_due: bool,
    #[serde(flatten)]
    pub item: ReviewItemView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GradeRequest {
    pub item_id: String,
    pub quality: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GradeResponse {
    pub next_state: ReviewState,
    pub next_due: DateTime<Utc>,
    pub interval_before: i64,
    pub ease_before: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DueListResponse {
    pub items: Vec<ReviewItemView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemListResponse {
    pub items: Vec<ReviewItemWithDue>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub since: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub reviews: Vec<ReviewLogEntry>,
}

/// One grading event in the history listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewLogEntry {
    pub item_id: String,
    pub graded_at: DateTime<Utc>,
    pub quality: i32,
    pub interval_before: i64,
    pub interval_after: i64,
    pub ease_before: f64,
    pub ease_after: f64,
    pub status_after: ItemStatus,
}

/// review_log row joined with the item's external identifier
#[derive(Debug, Clone, FromRow)]
pub struct ReviewLogRow {
    pub item_id: String,
    pub graded_at: DateTime<Utc>,
    pub quality: i32,
    pub interval_before: i64,
    pub interval_after: i64,
    pub ease_before: f64,
    pub ease_after: f64,
    pub status_after: String,
}

impl ReviewLogRow {
    /// Convert to the outbound history entry
    pub fn to_entry(&self) -> ReviewLogEntry {
        ReviewLogEntry {
            item_id: self.item_id.clone(),
            graded_at: self.graded_at,
            quality: self.quality,
            interval_before: self.interval_before,
            interval_after: self.interval_after,
            ease_before: self.ease_before,
            ease_after: self.ease_after,
            status_after: ItemStatus::from_str(&self.status_after).unwrap_or_default(),
        }
    }
}
