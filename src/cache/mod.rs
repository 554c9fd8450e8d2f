//! Cache Module
//!
//! Bounded in-memory record storage with age expiry and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default maximum number of entries, matching the upstream feed
pub const DEFAULT_CAPACITY: usize = 500;

/// Default entry lifetime in seconds (15 minutes)
pub const DEFAULT_MAX_AGE_SECS: u64 = 15 * 60;
