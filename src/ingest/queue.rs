//! Queue ingestion path
//!
//! Consumes one message at a time from an exclusive queue: decode, store,
//! then acknowledge. A message is acknowledged only once its record is in the
//! store; undecodable messages are never acknowledged.

use std::fmt;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::{Feed, IngestSource};
use crate::broker::{Binding, Broker, Delivery, Subscription};
use crate::cache::CacheEntry;
use crate::error::{FeedError, Result};
use crate::record::Record;

// == Consumer State ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumerState {
    Disconnected,
    Connecting,
    Subscribed,
    Consuming,
}

impl fmt::Display for ConsumerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConsumerState::Disconnected => "disconnected",
            ConsumerState::Connecting => "connecting",
            ConsumerState::Subscribed => "subscribed",
            ConsumerState::Consuming => "consuming",
        };
        f.write_str(name)
    }
}

// == Consume Summary ==
/// Per-subscription outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumeSummary {
    /// Stored and acknowledged
    pub stored: u64,
    /// Undecodable, left unacknowledged
    pub rejected: u64,
    /// Store or ack failures
    pub failed: u64,
}

// == Queue Consumer ==
#[derive(Debug)]
pub struct QueueConsumer {
    feed: Feed,
    binding: Binding,
    state: watch::Sender<ConsumerState>,
}

impl QueueConsumer {
    pub fn new(feed: Feed, binding: Binding) -> Self {
        let (state, _) = watch::channel(ConsumerState::Disconnected);
        Self {
            feed,
            binding,
            state,
        }
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn state(&self) -> ConsumerState {
        *self.state.borrow()
    }

    /// Receiver that observes every state change.
    pub fn watch_state(&self) -> watch::Receiver<ConsumerState> {
        self.state.subscribe()
    }

    fn transition(&self, next: ConsumerState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            debug!(from = %previous, to = %next, "queue consumer state changed");
        }
    }

    // == Connect ==
    /// Subscribes to the bound queue. On failure the consumer stays
    /// disconnected; reconnecting is up to the caller.
    pub async fn connect(&self, broker: &dyn Broker) -> Result<Box<dyn Subscription>> {
        self.transition(ConsumerState::Connecting);

        match broker.subscribe(&self.binding).await {
            Ok(subscription) => {
                self.transition(ConsumerState::Subscribed);
                info!(binding = %self.binding, "queue consumer subscribed");
                Ok(subscription)
            }
            Err(err) => {
                self.transition(ConsumerState::Disconnected);
                error!(binding = %self.binding, error = %err, "queue subscription failed");
                Err(err.into())
            }
        }
    }

    // == Handle Delivery ==
    /// Decodes, stores, then acknowledges a single message.
    pub async fn handle_delivery(
        &self,
        subscription: &mut dyn Subscription,
        delivery: Delivery,
    ) -> Result<CacheEntry> {
        self.transition(ConsumerState::Consuming);
        let delivery_tag = delivery.delivery_tag;

        let record = Record::from_slice(&delivery.body)
            .map_err(|source| FeedError::Decode { delivery_tag, source })?;
        let entry = self.feed.admit(record, IngestSource::Queue).await?;
        subscription.ack(delivery_tag).await?;

        Ok(entry)
    }

    // == Consume ==
    /// Processes deliveries strictly one after another until the
    /// subscription closes.
    pub async fn consume(&self, mut subscription: Box<dyn Subscription>) -> ConsumeSummary {
        let mut summary = ConsumeSummary::default();

        while let Some(delivery) = subscription.next_delivery().await {
            let delivery_tag = delivery.delivery_tag;
            match self.handle_delivery(subscription.as_mut(), delivery).await {
                Ok(entry) => {
                    summary.stored += 1;
                    debug!(delivery_tag, key = %entry.key, "queued record stored and acknowledged");
                }
                Err(err @ FeedError::Decode { .. }) => {
                    summary.rejected += 1;
                    error!(delivery_tag, error = %err, "message left unacknowledged");
                }
                Err(err) => {
                    summary.failed += 1;
                    error!(delivery_tag, error = %err, "failed to process queued message");
                }
            }
        }

        self.transition(ConsumerState::Disconnected);
        warn!(
            binding = %self.binding,
            stored = summary.stored,
            rejected = summary.rejected,
            failed = summary.failed,
            "queue subscription closed"
        );
        summary
    }

    // == Run ==
    /// Connects, then consumes until the subscription ends.
    pub async fn run(&self, broker: &dyn Broker) -> Result<ConsumeSummary> {
        let subscription = self.connect(broker).await?;
        Ok(self.consume(subscription).await)
    }
}
