//! Background Tasks Module
//!
//! # Tasks
//! - Expiry sweep: drops expired entries at a configured interval
//! - Queue consumer: feeds the store from the broker subscription

mod cleanup;
mod consumer;

pub use cleanup::{spawn_cleanup_task, MIN_SWEEP_INTERVAL};
pub use consumer::spawn_queue_consumer;
