//! Direct ingestion path
//!
//! Synchronous write path used by the HTTP submission endpoint.

use super::{Feed, IngestSource};
use crate::cache::CacheEntry;
use crate::error::Result;
use crate::record::Record;

/// Stamps records handed over by a caller and writes them to the feed.
/// No schema validation: any JSON object is stored verbatim.
#[derive(Debug, Clone)]
pub struct DirectIngestor {
    feed: Feed,
}

impl DirectIngestor {
    pub fn new(feed: Feed) -> Self {
        Self { feed }
    }

    pub async fn ingest(&self, record: Record) -> Result<CacheEntry> {
        self.feed.admit(record, IngestSource::Direct).await
    }
}
