//! In-process broker
//!
//! Topic-style exchange backed by tokio channels. Each subscription gets its
//! own exclusive queue that lives as long as the subscription; publishing fans
//! a message out to every queue bound with the same exchange and routing key.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use super::{Binding, Broker, Delivery, Subscription};
use crate::error::BrokerError;

#[derive(Debug)]
struct BrokerState {
    connected: bool,
    queues: HashMap<Binding, Vec<mpsc::UnboundedSender<Vec<u8>>>>,
}

// == In-Memory Broker ==
/// Broker living inside the process. Cloning shares the same exchange.
#[derive(Debug, Clone)]
pub struct InMemoryBroker {
    state: Arc<Mutex<BrokerState>>,
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBroker {
    /// Creates a connected broker with no queues.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BrokerState {
                connected: true,
                queues: HashMap::new(),
            })),
        }
    }

    /// Drops the channel: publishes and subscribes fail, and every open
    /// subscription ends once its buffered messages are drained.
    pub async fn disconnect(&self) {
        let mut state = self.state.lock().await;
        state.connected = false;
        state.queues.clear();
    }

    /// Restores the channel. Previous subscriptions stay closed.
    pub async fn reconnect(&self) {
        self.state.lock().await.connected = true;
    }

    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.connected
    }

    /// Number of open queues bound to `binding`.
    pub async fn queue_count(&self, binding: &Binding) -> usize {
        let state = self.state.lock().await;
        state
            .queues
            .get(binding)
            .map(|queues| queues.iter().filter(|q| !q.is_closed()).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl Broker for InMemoryBroker {
    async fn publish(&self, binding: &Binding, payload: Vec<u8>) -> Result<(), BrokerError> {
        let mut state = self.state.lock().await;
        if !state.connected {
            return Err(BrokerError::Unavailable("no active channel".to_string()));
        }

        let Some(queues) = state.queues.get_mut(binding) else {
            debug!(binding = %binding, "message unroutable, no queue bound");
            return Ok(());
        };

        // exclusive queues disappear with their consumer
        queues.retain(|queue| queue.send(payload.clone()).is_ok());
        debug!(binding = %binding, queues = queues.len(), "message routed");
        Ok(())
    }

    async fn subscribe(&self, binding: &Binding) -> Result<Box<dyn Subscription>, BrokerError> {
        let mut state = self.state.lock().await;
        if !state.connected {
            return Err(BrokerError::Unavailable("no active channel".to_string()));
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        state.queues.entry(binding.clone()).or_default().push(sender);
        debug!(binding = %binding, "exclusive queue declared and bound");

        Ok(Box::new(MemorySubscription {
            receiver,
            next_tag: 1,
            unacked: HashSet::new(),
        }))
    }
}

// == Subscription ==
#[derive(Debug)]
struct MemorySubscription {
    receiver: mpsc::UnboundedReceiver<Vec<u8>>,
    next_tag: u64,
    unacked: HashSet<u64>,
}

#[async_trait]
impl Subscription for MemorySubscription {
    async fn next_delivery(&mut self) -> Option<Delivery> {
        let body = self.receiver.recv().await?;
        let delivery_tag = self.next_tag;
        self.next_tag += 1;
        self.unacked.insert(delivery_tag);
        Some(Delivery { delivery_tag, body })
    }

    async fn ack(&mut self, delivery_tag: u64) -> Result<(), BrokerError> {
        if self.unacked.remove(&delivery_tag) {
            Ok(())
        } else {
            Err(BrokerError::UnknownDelivery(delivery_tag))
        }
    }
}
