//! Response DTOs for the feed API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::ingest::ConsumerState;
use crate::view::ViewItem;

/// Response body for direct submission (POST /api/data)
#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub message: String,
    /// Key the record was stored under
    pub key: String,
}

impl IngestResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            message: "Data stored successfully".to_string(),
            key: key.into(),
        }
    }
}

/// Response body for the windowed view (GET /api/view)
#[derive(Debug, Clone, Serialize)]
pub struct ViewResponse {
    /// Requested window size
    pub window: usize,
    /// Items actually returned
    pub count: usize,
    pub items: Vec<ViewItem>,
}

impl ViewResponse {
    pub fn new(window: usize, items: Vec<ViewItem>) -> Self {
        Self {
            window,
            count: items.len(),
            items,
        }
    }
}

/// Response body for publish-and-forward (POST /api/publish)
#[derive(Debug, Clone, Serialize)]
pub struct PublishResponse {
    pub published: bool,
    pub exchange: String,
    pub routing_key: String,
    /// Handling time in milliseconds
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    pub capacity: usize,
    pub hit_rate: f64,
    pub keys_issued: u64,
    pub consumer: ConsumerState,
}

impl StatsResponse {
    pub fn new(stats: CacheStats, capacity: usize, keys_issued: u64, consumer: ConsumerState) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            capacity,
            keys_issued,
            consumer,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Queue consumer state; direct ingestion works regardless
    pub consumer: ConsumerState,
}

impl HealthResponse {
    pub fn healthy(consumer: ConsumerState) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            consumer,
        }
    }
}
