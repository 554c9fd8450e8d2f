//! Shared feed state
//!
//! The single serialized gate both ingestion paths write through. Key
//! allocation and store mutation happen under one write lock, so an entry
//! is never stored under a key another writer could also receive.

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::KeyAllocator;
use crate::cache::{CacheEntry, CacheStats, CacheStore};
use crate::config::Config;
use crate::error::Result;
use crate::record::Record;

// == Ingest Source ==
/// Which path admitted a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestSource {
    Direct,
    Queue,
}

impl fmt::Display for IngestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestSource::Direct => f.write_str("direct"),
            IngestSource::Queue => f.write_str("queue"),
        }
    }
}

// == Feed Stats ==
/// Store counters, capacity and allocator progress read at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedStats {
    pub cache: CacheStats,
    pub capacity: usize,
    pub keys_issued: u64,
}

#[derive(Debug)]
struct FeedState {
    allocator: KeyAllocator,
    store: CacheStore,
}

// == Feed ==
/// Cloneable handle to the shared allocator and store.
#[derive(Debug, Clone)]
pub struct Feed {
    state: Arc<RwLock<FeedState>>,
}

impl Feed {
    pub fn new(store: CacheStore, allocator: KeyAllocator) -> Self {
        Self {
            state: Arc::new(RwLock::new(FeedState { allocator, store })),
        }
    }

    /// Builds the store and allocator from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CacheStore::new(config.capacity, config.max_age()),
            KeyAllocator::new(config.key_seed),
        )
    }

    // == Admit ==
    /// Allocates a key and stores the record, atomically with respect to
    /// every other writer.
    pub async fn admit(&self, record: Record, source: IngestSource) -> Result<CacheEntry> {
        let mut state = self.state.write().await;
        let key = state.allocator.next_key()?;
        let entry = state.store.put(key.to_string(), record)?;
        debug!(key = %entry.key, source = %source, "record admitted");
        Ok(entry)
    }

    // == Reads ==
    /// Live entries, most recently used first. Takes the write lock because
    /// the scan drops expired entries.
    pub async fn snapshot(&self) -> Vec<CacheEntry> {
        self.state.write().await.store.get_all()
    }

    /// Reads one entry, refreshing its recency.
    pub async fn lookup(&self, key: &str) -> Result<CacheEntry> {
        self.state.write().await.store.get(key)
    }

    pub async fn purge_expired(&self) -> usize {
        self.state.write().await.store.purge_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.state.read().await.store.stats()
    }

    pub async fn keys_issued(&self) -> u64 {
        self.state.read().await.allocator.issued()
    }

    /// Counters, capacity and keys issued, all under one read guard so a
    /// concurrent admit cannot land between them.
    pub async fn stats_snapshot(&self) -> FeedStats {
        let state = self.state.read().await;
        FeedStats {
            cache: state.store.stats(),
            capacity: state.store.capacity(),
            keys_issued: state.allocator.issued(),
        }
    }
}
