//! Queue admission and statistics endpoints

use axum::{extract::State, Extension, Json};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::{AdmitRequest, AdmitResponse, QueueStatsResponse};
use crate::routes::auth::AuthenticatedLearner;
use crate::services::admission;
use crate::AppState;

/// POST /api/queue/admit
pub async fn admit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Json(payload): Json<AdmitRequest>,
) -> Result<Json<AdmitResponse>> {
    if payload.item_id.trim().is_empty() {
        return Err(ApiError::BadRequest("item_id must not be empty".to_string()));
    }

    let now = Utc::now();
    let outcome = admission::admit(
        &state.db,
        &state.scheduler,
        auth.learner_id,
        &payload.item_id,
        &payload.display_name,
        now,
    )
    .await?;

    Ok(Json(AdmitResponse {
        created: outcome.created,
        item: outcome.item.to_view(),
    }))
}

/// GET /api/queue/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
) -> Result<Json<QueueStatsResponse>> {
    let now = Utc::now();
    let stats = state.db.get_queue_stats(auth.learner_id, now).await?;
    Ok(Json(stats))
}
