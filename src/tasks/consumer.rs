//! Queue consumer task
//!
//! Runs the queue ingestion path in the background. A broker failure ends
//! this task only; direct ingestion is unaffected.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::broker::Broker;
use crate::ingest::QueueConsumer;

/// Spawns the consumer for a single subscription attempt.
pub fn spawn_queue_consumer(consumer: Arc<QueueConsumer>, broker: Arc<dyn Broker>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(binding = %consumer.binding(), "starting queue consumer");

        match consumer.run(broker.as_ref()).await {
            Ok(summary) => info!(
                stored = summary.stored,
                rejected = summary.rejected,
                failed = summary.failed,
                "queue consumer finished"
            ),
            Err(err) => error!(error = %err, "queue consumer stopped, direct ingestion continues"),
        }
    })
}
