//! Broker Module
//!
//! Abstraction over the message broker used for publish-and-forward and for
//! the queue ingestion path. Connection management and reconnection belong to
//! implementations; the feed only sees these traits.

mod memory;

use std::fmt;

use async_trait::async_trait;

use crate::error::BrokerError;

pub use memory::InMemoryBroker;

// == Binding ==
/// Exchange and routing key pair a queue is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    pub exchange: String,
    pub routing_key: String,
}

impl Binding {
    pub fn new(exchange: impl Into<String>, routing_key: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            routing_key: routing_key.into(),
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.exchange, self.routing_key)
    }
}

// == Delivery ==
/// One message handed to a subscriber, awaiting acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Subscription-scoped tag used to acknowledge this message
    pub delivery_tag: u64,
    /// Raw message body
    pub body: Vec<u8>,
}

// == Broker ==
/// A message broker reachable over some channel.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Publishes `payload` to the binding's exchange under its routing key.
    async fn publish(&self, binding: &Binding, payload: Vec<u8>) -> Result<(), BrokerError>;

    /// Declares an exclusive queue bound to `binding` and starts consuming
    /// from it with manual acknowledgment.
    async fn subscribe(&self, binding: &Binding) -> Result<Box<dyn Subscription>, BrokerError>;
}

// == Subscription ==
/// A consumer on an exclusive queue.
#[async_trait]
pub trait Subscription: Send {
    /// Waits for the next message. `None` once the channel is closed.
    async fn next_delivery(&mut self) -> Option<Delivery>;

    /// Acknowledges a message previously returned by `next_delivery`.
    async fn ack(&mut self, delivery_tag: u64) -> Result<(), BrokerError>;
}
