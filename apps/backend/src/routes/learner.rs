//! Learner registration and status endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::{LearnerStatusResponse, RegisterRequest, RegisterResponse};
use crate::routes::auth::AuthenticatedLearner;
use crate::AppState;

/// POST /api/learner/register
/// Creates a new learner and returns the token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Option<RegisterRequest>>,
) -> Result<Json<RegisterResponse>> {
    let handle = payload.and_then(|p| p.handle);
    let learner = state.db.create_learner(handle.as_deref()).await?;

    tracing::info!("Registered new learner: {}", learner.id);

    Ok(Json(RegisterResponse {
        learner_id: learner.id,
        token: learner.token,
    }))
}

/// GET /api/learner/status
/// Returns learner status
pub async fn status(
    Extension(auth): Extension<AuthenticatedLearner>,
    State(state): State<AppState>,
) -> Result<Json<LearnerStatusResponse>> {
    let learner = state
        .db
        .get_learner_by_token(&auth.token)
        .await?
        .ok_or_else(|| crate::error::ApiError::NotFound("Learner not found".to_string()))?;

    Ok(Json(LearnerStatusResponse {
        learner_id: learner.id,
        handle: learner.handle,
        last_seen_at: learner.last_seen_at,
    }))
}
