//! Grading and due-query endpoints

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::error::Result;
use crate::models::{
    DueListResponse, GradeRequest, GradeResponse, HistoryQuery, HistoryResponse, ItemListResponse,
    Quality,
};
use crate::routes::auth::AuthenticatedLearner;
use crate::services::{grading, queue};
use crate::AppState;

/// POST /api/review/grade
pub async fn grade(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Json(payload): Json<GradeRequest>,
) -> Result<Json<GradeResponse>> {
    // Reject out-of-range quality before any state is touched
    let quality = Quality::new(payload.quality)?;

    let now = Utc::now();
    let graded = grading::grade(
        &state.db,
        &state.scheduler,
        auth.learner_id,
        &payload.item_id,
        quality,
        now,
    )
    .await?;

    Ok(Json(GradeResponse {
        next_state: graded.outcome.new_state,
        next_due: graded.outcome.next_due,
        interval_before: graded.interval_before,
        ease_before: graded.ease_before,
    }))
}

/// GET /api/review/due
pub async fn due(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
) -> Result<Json<DueListResponse>> {
    let now = Utc::now();
    let items = queue::list_due(&state.db, auth.learner_id, now).await?;
    Ok(Json(DueListResponse { items }))
}

/// GET /api/review/items
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
) -> Result<Json<ItemListResponse>> {
    let now = Utc::now();
    let items = queue::list_all(&state.db, auth.learner_id, now).await?;
    Ok(Json(ItemListResponse { items }))
}

/// GET /api/review/history
pub async fn history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>> {
    let rows = state
        .db
        .get_review_log_since(auth.learner_id, query.since)
        .await?;

    Ok(Json(HistoryResponse {
        reviews: rows.iter().map(|row| row.to_entry()).collect(),
    }))
}
