//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helper functions for creating test data
//! - Authentication helpers
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

pub mod fixtures;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use flashback_backend::db::Database;
use flashback_backend::models::Learner;
use flashback_backend::routes;
use flashback_backend::AppState;
use flashback_core::Sm2;

/// Test context containing database connection and test server.
///
/// Use this to set up integration tests with a real database connection.
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);

        let state = AppState {
            db: db.clone(),
            scheduler: Arc::new(Sm2::default()),
        };

        let app = build_test_router(state);

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test learner and return its ID and token.
    pub async fn create_test_learner(&self, handle: Option<&str>) -> (Uuid, String) {
        let learner = self
            .db
            .create_learner(handle)
            .await
            .expect("Failed to create test learner");
        (learner.id, learner.token)
    }

    /// Get learner by token.
    pub async fn get_learner_by_token(&self, token: &str) -> Option<Learner> {
        self.db.get_learner_by_token(token).await.ok().flatten()
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Force an item's next review time, bypassing the scheduler.
    ///
    /// Due-ness is computed against next_review_at on read, so tests can
    /// move items into the past instead of waiting out real intervals.
    pub async fn set_next_review_at(
        &self,
        learner_id: Uuid,
        item_id: &str,
        next_review_at: DateTime<Utc>,
    ) {
        sqlx::query(
            "UPDATE review_items SET next_review_at = $3 WHERE learner_id = $1 AND item_id = $2",
        )
        .bind(learner_id)
        .bind(item_id)
        .bind(next_review_at)
        .execute(self.db.pool())
        .await
        .expect("Failed to set next_review_at");
    }

    /// Clean up test data for a learner.
    ///
    /// Call this after tests to remove test data.
    pub async fn cleanup_learner(&self, learner_id: Uuid) {
        // Delete in order due to foreign keys
        let _ = sqlx::query("DELETE FROM review_log WHERE learner_id = $1")
            .bind(learner_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM review_items WHERE learner_id = $1")
            .bind(learner_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM learners WHERE id = $1")
            .bind(learner_id)
            .execute(self.db.pool())
            .await;
    }
}

/// Build the test router with all routes.
fn build_test_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/learner/status", get(routes::learner::status))
        .route("/api/queue/admit", post(routes::queue::admit))
        .route("/api/queue/stats", get(routes::queue::stats))
        .route("/api/review/grade", post(routes::review::grade))
        .route("/api/review/due", get(routes::review::due))
        .route("/api/review/items", get(routes::review::list))
        .route("/api/review/history", get(routes::review::history))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/learner/register", post(routes::learner::register))
        .merge(protected_routes)
        .with_state(state)
}
