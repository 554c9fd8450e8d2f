//! Cache Store Module
//!
//! Bounded record storage combining a HashMap with LRU tracking and age-based expiry.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::{FeedError, Result};
use crate::record::Record;

// == Cache Store ==
/// Capacity- and age-limited record storage.
///
/// Entries whose age has reached `max_age` are never returned, whether or not
/// they have been physically removed yet. The entry count never exceeds
/// `capacity`.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    capacity: usize,
    max_age: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store holding at most `capacity` entries (at least one),
    /// each live for `max_age` after admission.
    pub fn new(capacity: usize, max_age: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity: capacity.max(1),
            max_age,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    // == Put ==
    /// Admits a record under `key`, stamped with the current instant.
    pub fn put(&mut self, key: String, record: Record) -> Result<CacheEntry> {
        self.put_at(key, record, Utc::now())
    }

    /// Admits a record under `key`, stamped with `now`.
    ///
    /// A full store first drops expired entries, then evicts the least
    /// recently used live one. A live entry already holding `key` is never
    /// replaced.
    pub fn put_at(&mut self, key: String, record: Record, now: DateTime<Utc>) -> Result<CacheEntry> {
        if let Some(existing) = self.entries.get(&key) {
            if !existing.is_expired_at(self.max_age, now) {
                return Err(FeedError::KeyConflict(key));
            }
            self.remove(&key);
            self.stats.record_expirations(1);
        }

        if self.entries.len() >= self.capacity {
            self.purge_expired_at(now);
        }

        if self.entries.len() >= self.capacity {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "evicted least recently used entry");
            }
        }

        let entry = CacheEntry::with_inserted_at(key.clone(), record, now);
        self.entries.insert(key.clone(), entry.clone());
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());

        Ok(entry)
    }

    // == Get ==
    /// Reads one entry and marks it most recently used.
    pub fn get(&mut self, key: &str) -> Result<CacheEntry> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at(&mut self, key: &str, now: DateTime<Utc>) -> Result<CacheEntry> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return Err(FeedError::NotFound(key.to_string()));
        };

        if entry.is_expired_at(self.max_age, now) {
            self.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return Err(FeedError::Expired(key.to_string()));
        }

        let entry = entry.clone();
        self.stats.record_hit();
        self.lru.touch(key);
        Ok(entry)
    }

    // == Get All ==
    /// Snapshot of all live entries, most recently used first.
    ///
    /// Does not affect recency. Expired entries met during the scan are
    /// dropped from the store.
    pub fn get_all(&mut self) -> Vec<CacheEntry> {
        self.get_all_at(Utc::now())
    }

    pub fn get_all_at(&mut self, now: DateTime<Utc>) -> Vec<CacheEntry> {
        let mut live = Vec::with_capacity(self.entries.len());
        let mut expired = Vec::new();

        for key in self.lru.most_recent_first() {
            if let Some(entry) = self.entries.get(key) {
                if entry.is_expired_at(self.max_age, now) {
                    expired.push(key.to_string());
                } else {
                    live.push(entry.clone());
                }
            }
        }

        if !expired.is_empty() {
            for key in &expired {
                self.remove(key);
            }
            self.stats.record_expirations(expired.len());
            debug!(count = expired.len(), "dropped expired entries during scan");
        }

        live
    }

    // == Purge Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn purge_expired_at(&mut self, now: DateTime<Utc>) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(self.max_age, now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }
        self.stats.record_expirations(expired.len());
        expired.len()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Resident entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use serde_json::json;

    const MAX_AGE: Duration = Duration::from_secs(900);

    fn record(n: u64) -> Record {
        serde_json::from_value(json!({ "luwId": n, "type": "test" })).unwrap()
    }

    fn keys(entries: &[CacheEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(10, MAX_AGE);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 10);
        assert_eq!(store.max_age(), MAX_AGE);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut store = CacheStore::new(0, MAX_AGE);
        store.put("1".to_string(), record(1)).unwrap();
        store.put("2".to_string(), record(2)).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get("2").is_ok());
    }

    #[test]
    fn test_put_and_get() {
        let mut store = CacheStore::new(10, MAX_AGE);
        let stored = store.put("1".to_string(), record(1)).unwrap();
        let fetched = store.get("1").unwrap();

        assert_eq!(stored, fetched);
        assert_eq!(fetched.record, record(1));
    }

    #[test]
    fn test_get_nonexistent() {
        let mut store = CacheStore::new(10, MAX_AGE);
        assert!(matches!(store.get("9"), Err(FeedError::NotFound(_))));
    }

    #[test]
    fn test_put_live_key_conflict() {
        let mut store = CacheStore::new(10, MAX_AGE);
        store.put("1".to_string(), record(1)).unwrap();

        let result = store.put("1".to_string(), record(2));
        assert!(matches!(result, Err(FeedError::KeyConflict(_))));
        assert_eq!(store.get("1").unwrap().record, record(1));
    }

    #[test]
    fn test_put_replaces_expired_key() {
        let t0 = Utc::now();
        let mut store = CacheStore::new(10, MAX_AGE);
        store.put_at("1".to_string(), record(1), t0).unwrap();

        let later = t0 + ChronoDuration::seconds(901);
        store.put_at("1".to_string(), record(2), later).unwrap();

        assert_eq!(store.get_at("1", later).unwrap().record, record(2));
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_lru_eviction_insertion_order() {
        let mut store = CacheStore::new(3, MAX_AGE);
        for n in 1..=4 {
            store.put(n.to_string(), record(n)).unwrap();
        }

        assert_eq!(store.len(), 3);
        assert!(matches!(store.get("1"), Err(FeedError::NotFound(_))));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_lru_touch_on_get() {
        let mut store = CacheStore::new(3, MAX_AGE);
        for n in 1..=3 {
            store.put(n.to_string(), record(n)).unwrap();
        }
        store.get("1").unwrap();
        store.put("4".to_string(), record(4)).unwrap();

        assert!(store.get("1").is_ok());
        assert!(matches!(store.get("2"), Err(FeedError::NotFound(_))));
    }

    #[test]
    fn test_full_store_prefers_purging_expired() {
        let t0 = Utc::now();
        let mut store = CacheStore::new(2, Duration::from_secs(10));
        store.put_at("1".to_string(), record(1), t0).unwrap();
        store
            .put_at("2".to_string(), record(2), t0 + ChronoDuration::seconds(5))
            .unwrap();

        // "1" is expired, "2" is live and least recently used otherwise
        let now = t0 + ChronoDuration::seconds(11);
        store.put_at("3".to_string(), record(3), now).unwrap();

        let live = store.get_all_at(now);
        assert_eq!(keys(&live), vec!["3", "2"]);
        assert_eq!(store.stats().evictions, 0);
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_get_all_most_recent_first_without_touching() {
        let mut store = CacheStore::new(3, MAX_AGE);
        for n in 1..=3 {
            store.put(n.to_string(), record(n)).unwrap();
        }

        assert_eq!(keys(&store.get_all()), vec!["3", "2", "1"]);

        // scanning must not refresh "1"
        store.put("4".to_string(), record(4)).unwrap();
        assert_eq!(keys(&store.get_all()), vec!["4", "3", "2"]);
    }

    #[test]
    fn test_get_all_drops_expired() {
        let t0 = Utc::now();
        let mut store = CacheStore::new(10, Duration::from_secs(60));
        store.put_at("1".to_string(), record(1), t0).unwrap();
        store
            .put_at("2".to_string(), record(2), t0 + ChronoDuration::seconds(30))
            .unwrap();

        let live = store.get_all_at(t0 + ChronoDuration::seconds(61));
        assert_eq!(keys(&live), vec!["2"]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_expired_entry() {
        let t0 = Utc::now();
        let mut store = CacheStore::new(10, Duration::from_secs(1));
        store.put_at("1".to_string(), record(1), t0).unwrap();

        let result = store.get_at("1", t0 + ChronoDuration::seconds(2));
        assert!(matches!(result, Err(FeedError::Expired(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let t0 = Utc::now();
        let mut store = CacheStore::new(10, Duration::from_secs(10));
        store.put_at("1".to_string(), record(1), t0).unwrap();
        store
            .put_at("2".to_string(), record(2), t0 + ChronoDuration::seconds(8))
            .unwrap();

        let removed = store.purge_expired_at(t0 + ChronoDuration::seconds(12));
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(10, MAX_AGE);
        store.put("1".to_string(), record(1)).unwrap();
        store.get("1").unwrap();
        let _ = store.get("2");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
