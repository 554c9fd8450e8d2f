//! Error types for the record feed
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Broker Error Enum ==
/// Failures reported by a message broker implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    /// No active channel to the broker
    #[error("broker unavailable: {0}")]
    Unavailable(String),

    /// The channel was closed while in use
    #[error("broker channel closed")]
    ChannelClosed,

    /// Ack for a delivery tag this subscription never handed out (or already acked)
    #[error("unknown delivery tag {0}")]
    UnknownDelivery(u64),
}

// == Feed Error Enum ==
/// Unified error type for the record feed.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Key not found in the store
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key exists but its entry has outlived the maximum age
    #[error("Key expired: {0}")]
    Expired(String),

    /// A live entry already occupies the key
    #[error("Key already in use: {0}")]
    KeyConflict(String),

    /// The allocator cannot issue another key
    #[error("Key space exhausted after {0}")]
    KeySpaceExhausted(u64),

    /// A queued message body is not a structured record
    #[error("Failed to decode message {delivery_tag}: {source}")]
    Decode {
        delivery_tag: u64,
        #[source]
        source: serde_json::Error,
    },

    /// Broker interaction failed
    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FeedError {
    // == Status Mapping ==
    /// HTTP status used when this error crosses the API boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            FeedError::NotFound(_) | FeedError::Expired(_) => StatusCode::NOT_FOUND,
            FeedError::KeyConflict(_) => StatusCode::CONFLICT,
            FeedError::Decode { .. } => StatusCode::BAD_REQUEST,
            FeedError::Broker(BrokerError::Unavailable(_))
            | FeedError::Broker(BrokerError::ChannelClosed) => StatusCode::SERVICE_UNAVAILABLE,
            FeedError::Broker(BrokerError::UnknownDelivery(_))
            | FeedError::KeySpaceExhausted(_)
            | FeedError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the record feed.
pub type Result<T> = std::result::Result<T, FeedError>;
