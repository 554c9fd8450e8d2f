//! Cache Statistics Module
//!
//! Tracks lookups, evictions and expirations.

use serde::Serialize;

// == Cache Stats ==
/// Lookup and removal counters for one store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups that found a live entry
    pub hits: u64,
    /// Lookups for a missing or expired key
    pub misses: u64,
    /// Entries removed by capacity pressure
    pub evictions: u64,
    /// Entries removed because they outlived the maximum age
    pub expirations: u64,
    /// Entries currently resident
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// All counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// hits / (hits + misses), or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Counts a lookup that found a live entry.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Counts a lookup for a missing or expired key.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Counts one capacity eviction.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Expirations ==
    /// Adds `count` entries dropped for age.
    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Update Entry Count ==
    /// Sets the resident entry count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
