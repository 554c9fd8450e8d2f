//! Key Allocator
//!
//! Issues strictly increasing record keys from a configurable seed.

use crate::error::{FeedError, Result};

/// First key issued when no seed is configured
pub const DEFAULT_KEY_SEED: u64 = 1;

// == Key Allocator ==
/// Monotonic key source. Not synchronized on its own; callers share it
/// through [`Feed`](super::Feed), which serializes allocation with storage.
#[derive(Debug)]
pub struct KeyAllocator {
    seed: u64,
    next: Option<u64>,
}

impl Default for KeyAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_SEED)
    }
}

impl KeyAllocator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            next: Some(seed),
        }
    }

    // == Next Key ==
    /// Issues the next key. Fails once `u64::MAX` has been handed out.
    pub fn next_key(&mut self) -> Result<u64> {
        let key = self.next.ok_or(FeedError::KeySpaceExhausted(u64::MAX))?;
        self.next = key.checked_add(1);
        Ok(key)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of keys handed out so far.
    pub fn issued(&self) -> u64 {
        match self.next {
            Some(next) => next - self.seed,
            None => (u64::MAX - self.seed).saturating_add(1),
        }
    }
}
