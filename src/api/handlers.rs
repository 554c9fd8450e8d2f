//! API Handlers
//!
//! HTTP request handlers for each feed endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use crate::broker::{Binding, Broker};
use crate::config::Config;
use crate::error::{FeedError, Result};
use crate::ingest::{DirectIngestor, Feed, QueueConsumer};
use crate::models::{
    HealthResponse, IngestResponse, PublishResponse, StatsResponse, ViewQuery, ViewResponse,
};
use crate::record::Record;
use crate::view::{project, ViewItem, Window};

/// Header carrying publish handling time in milliseconds
pub const ELAPSED_HEADER: &str = "x-elapsed-ms";

/// Application state shared across all handlers.
///
/// The feed is the single gate both the direct path and the queue consumer
/// write through.
#[derive(Clone)]
pub struct AppState {
    pub feed: Feed,
    pub direct: DirectIngestor,
    pub consumer: Arc<QueueConsumer>,
    pub broker: Arc<dyn Broker>,
    /// Default window for `GET /api/view`
    pub view_window: usize,
}

impl AppState {
    /// Wires both ingestion paths to `feed`.
    pub fn new(feed: Feed, broker: Arc<dyn Broker>, binding: Binding, view_window: usize) -> Self {
        Self {
            direct: DirectIngestor::new(feed.clone()),
            consumer: Arc::new(QueueConsumer::new(feed.clone(), binding)),
            feed,
            broker,
            view_window,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config, broker: Arc<dyn Broker>) -> Self {
        Self::new(
            Feed::from_config(config),
            broker,
            config.binding(),
            config.view_window,
        )
    }

    pub fn binding(&self) -> &Binding {
        self.consumer.binding()
    }
}

/// Handler for POST /api/data
///
/// Stores the submitted record through the direct ingestion path.
pub async fn ingest_handler(
    State(state): State<AppState>,
    Json(record): Json<Record>,
) -> Result<(StatusCode, Json<IngestResponse>)> {
    let entry = state.direct.ingest(record).await?;
    Ok((StatusCode::CREATED, Json(IngestResponse::new(entry.key))))
}

/// Handler for GET /api/data
///
/// Returns the whole live feed, newest first.
pub async fn feed_handler(State(state): State<AppState>) -> Json<Vec<ViewItem>> {
    let entries = state.feed.snapshot().await;
    Json(project(entries, Window::All))
}

/// Handler for GET /api/data/:key
pub async fn lookup_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ViewItem>> {
    let entry = state.feed.lookup(&key).await?;
    Ok(Json(ViewItem::from_entry(&entry)))
}

/// Handler for GET /api/view
///
/// Windowed feed. `last=N` (default) keeps the tail of the newest-first
/// ordering, `latest=N` the head.
pub async fn view_handler(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Json<ViewResponse> {
    let window = query.window(state.view_window);
    let items = project(state.feed.snapshot().await, window);
    let size = match window {
        Window::Last(n) | Window::Latest(n) => n,
        Window::All => items.len(),
    };

    Json(ViewResponse::new(size, items))
}

/// Handler for POST /api/publish
///
/// Serializes the record and hands it to the broker. Success or failure is
/// reported in the body, and handling time in both the body and
/// [`ELAPSED_HEADER`].
pub async fn publish_handler(
    State(state): State<AppState>,
    Json(record): Json<Record>,
) -> Response {
    let started = Instant::now();
    let binding = state.binding().clone();

    let outcome = match record.to_vec() {
        Ok(payload) => state
            .broker
            .publish(&binding, payload)
            .await
            .map_err(FeedError::from),
        Err(err) => Err(FeedError::Internal(err.to_string())),
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let (status, error) = match outcome {
        Ok(()) => {
            info!(binding = %binding, elapsed_ms, "record published");
            (StatusCode::ACCEPTED, None)
        }
        Err(err) => {
            warn!(binding = %binding, elapsed_ms, error = %err, "publish failed");
            (err.status_code(), Some(err.to_string()))
        }
    };

    let body = PublishResponse {
        published: error.is_none(),
        exchange: binding.exchange,
        routing_key: binding.routing_key,
        elapsed_ms,
        error,
    };

    (status, [(ELAPSED_HEADER, elapsed_ms.to_string())], Json(body)).into_response()
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let snapshot = state.feed.stats_snapshot().await;
    Json(StatsResponse::new(
        snapshot.cache,
        snapshot.capacity,
        snapshot.keys_issued,
        state.consumer.state(),
    ))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.consumer.state()))
}
