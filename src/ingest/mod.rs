//! Ingestion Module
//!
//! The two writers feeding the store (direct submission and the queue
//! consumer) and the shared gate they both go through.

mod allocator;
mod direct;
mod feed;
mod queue;

pub use allocator::{KeyAllocator, DEFAULT_KEY_SEED};
pub use direct::DirectIngestor;
pub use feed::{Feed, FeedStats, IngestSource};
pub use queue::{ConsumeSummary, ConsumerState, QueueConsumer};
