//! Expiry sweep task
//!
//! Periodically drops expired entries. Reads already filter expired entries
//! on their own; the sweep only bounds how long they stay resident.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::ingest::Feed;

/// Shortest sweep period; smaller intervals are raised to this.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Spawns a background task that purges expired entries every `interval`.
///
/// Periods below [`MIN_SWEEP_INTERVAL`] are clamped. Returns the task handle
/// so it can be aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_cleanup_task(feed.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task(feed: Feed, interval: Duration) -> JoinHandle<()> {
    let period = interval.max(MIN_SWEEP_INTERVAL);

    tokio::spawn(async move {
        info!(interval_ms = period.as_millis() as u64, "starting expiry sweep task");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = feed.purge_expired().await;
            if removed > 0 {
                info!(removed, "expiry sweep dropped entries");
            } else {
                debug!("expiry sweep found nothing to drop");
            }
        }
    })
}
