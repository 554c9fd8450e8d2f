//! LRU Tracker Module
//!
//! Orders keys by last access for least-recently-used eviction.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Every touch stamps the key with a fresh, strictly increasing tick.
/// The smallest tick is the least recently used key; since ticks are never
/// reused, never-read keys fall back to insertion order.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// tick -> key, ascending = oldest first
    order: BTreeMap<u64, String>,
    /// key -> its current tick
    ticks: HashMap<String, u64>,
    next_tick: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, tracking it if new.
    pub fn touch(&mut self, key: &str) {
        let tick = self.next_tick;
        self.next_tick += 1;

        if let Some(old) = self.ticks.insert(key.to_string(), tick) {
            self.order.remove(&old);
        }
        self.order.insert(tick, key.to_string());
    }

    // == Remove ==
    /// Stops tracking a key.
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.order.values().next().map(String::as_str)
    }

    // == Iteration ==
    /// Iterates keys from most to least recently used.
    pub fn most_recent_first(&self) -> impl Iterator<Item = &str> {
        self.order.values().rev().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.ticks.contains_key(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_new() {
        let lru = LruTracker::new();
        assert!(lru.is_empty());
        assert_eq!(lru.peek_oldest(), None);
    }

    #[test]
    fn test_insertion_order_breaks_ties() {
        let mut lru = LruTracker::new();
        lru.touch("1");
        lru.touch("2");
        lru.touch("3");

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_oldest(), Some("1"));
    }

    #[test]
    fn test_touch_existing_key_moves_it_back() {
        let mut lru = LruTracker::new();
        lru.touch("1");
        lru.touch("2");
        lru.touch("3");
        lru.touch("1");

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.evict_oldest(), Some("2".to_string()));
        assert_eq!(lru.evict_oldest(), Some("3".to_string()));
        assert_eq!(lru.evict_oldest(), Some("1".to_string()));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_remove() {
        let mut lru = LruTracker::new();
        lru.touch("1");
        lru.touch("2");
        lru.remove("1");
        lru.remove("missing");

        assert!(!lru.contains("1"));
        assert!(lru.contains("2"));
        assert_eq!(lru.peek_oldest(), Some("2"));
    }

    #[test]
    fn test_most_recent_first() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.touch("b");
        lru.touch("c");
        lru.touch("a");

        let order: Vec<&str> = lru.most_recent_first().collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }
}
