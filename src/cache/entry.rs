//! Cache Entry Module
//!
//! Defines a stored record together with its key and admission time.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::record::Record;

// == Cache Entry ==
/// A record admitted to the store. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheEntry {
    /// Allocated key, decimal form
    pub key: String,
    /// The stored record
    pub record: Record,
    /// Wall-clock instant the entry was admitted
    pub inserted_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current instant.
    pub fn new(key: impl Into<String>, record: Record) -> Self {
        Self::with_inserted_at(key, record, Utc::now())
    }

    /// Creates an entry stamped with an explicit instant.
    pub fn with_inserted_at(key: impl Into<String>, record: Record, inserted_at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            record,
            inserted_at,
        }
    }

    // == Age ==
    /// Age of the entry at `now`. Clock skew backwards yields zero.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.inserted_at).to_std().unwrap_or(Duration::ZERO)
    }

    // == Is Expired ==
    /// Checks whether the entry has reached `max_age` at `now`.
    ///
    /// Boundary condition: an entry whose age equals `max_age` is already expired.
    pub fn is_expired_at(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        self.age_at(now) >= max_age
    }

    /// Returns how long the entry stays live, zero once expired.
    pub fn ttl_remaining_at(&self, max_age: Duration, now: DateTime<Utc>) -> Duration {
        max_age.saturating_sub(self.age_at(now))
    }
}
