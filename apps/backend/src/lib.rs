pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;
use flashback_core::Sm2;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub scheduler: Arc<Sm2>,
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Connect to database
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let state = AppState {
        db: Arc::new(db),
        scheduler: Arc::new(Sm2::default()),
    };

    // Build router with protected routes
    let protected_routes = Router::new()
        // Learner routes
        .route("/api/learner/status", get(routes::learner::status))
        // Queue routes
        .route("/api/queue/admit", post(routes::queue::admit))
        .route("/api/queue/stats", get(routes::queue::stats))
        // Review routes
        .route("/api/review/grade", post(routes::review::grade))
        .route("/api/review/due", get(routes::review::due))
        .route("/api/review/items", get(routes::review::list))
        .route("/api/review/history", get(routes::review::history))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    // Build full router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/learner/register", post(routes::learner::register))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
