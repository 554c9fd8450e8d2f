//! Record Feed - a bounded in-memory feed of recent business records
//!
//! Records arrive through a direct HTTP write path and through a message
//! queue consumer, land in a capacity- and age-limited LRU store, and are read
//! back as a newest-first feed.

pub mod api;
pub mod broker;
pub mod cache;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod record;
pub mod tasks;
pub mod view;

pub use api::AppState;
pub use config::Config;
pub use error::{BrokerError, FeedError};
pub use ingest::Feed;
pub use record::Record;
pub use tasks::{spawn_cleanup_task, spawn_queue_consumer};
