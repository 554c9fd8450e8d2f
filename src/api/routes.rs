//! API Routes
//!
//! Configures the Axum router with all feed endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    feed_handler, health_handler, ingest_handler, lookup_handler, publish_handler, stats_handler,
    view_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /api/data` - Submit a record (direct ingestion)
/// - `GET /api/data` - Full feed, newest first
/// - `GET /api/data/:key` - Single entry lookup
/// - `GET /api/view` - Windowed feed (`?last=N` or `?latest=N`)
/// - `POST /api/publish` - Forward a record to the broker
/// - `GET /stats` - Store statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/data", post(ingest_handler).get(feed_handler))
        .route("/api/data/:key", get(lookup_handler))
        .route("/api/view", get(view_handler))
        .route("/api/publish", post(publish_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
