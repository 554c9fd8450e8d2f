//! API Module
//!
//! HTTP handlers and routing for the record feed.
//!
//! # Endpoints
//! - `POST /api/data` - Submit a record
//! - `GET /api/data` - Full feed
//! - `GET /api/data/:key` - Single entry lookup
//! - `GET /api/view` - Windowed feed
//! - `POST /api/publish` - Forward a record to the broker
//! - `GET /stats` - Store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
