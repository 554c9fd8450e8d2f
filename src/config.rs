//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::broker::Binding;
use crate::cache::{DEFAULT_CAPACITY, DEFAULT_MAX_AGE_SECS};
use crate::ingest::DEFAULT_KEY_SEED;
use crate::view::DEFAULT_VIEW_WINDOW;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the store can hold
    pub capacity: usize,
    /// Entry lifetime in seconds
    pub max_age_secs: u64,
    /// First key issued by the allocator
    pub key_seed: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Exchange records are published to and consumed from
    pub exchange: String,
    /// Routing key (topic) within the exchange
    pub routing_key: String,
    /// Default size of the windowed view
    pub view_window: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum entries (default: 500, must be positive)
    /// - `CACHE_MAX_AGE` - Entry lifetime in seconds (default: 900, must be positive)
    /// - `KEY_SEED` - First allocated key (default: 1)
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `BROKER_EXCHANGE` - Exchange name (default: `records`)
    /// - `BROKER_ROUTING_KEY` - Routing key (default: `records.ingest`)
    /// - `VIEW_WINDOW` - Default window for the view endpoint (default: 15)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: positive_var("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            max_age_secs: positive_var("CACHE_MAX_AGE").unwrap_or(defaults.max_age_secs),
            key_seed: parsed_var("KEY_SEED").unwrap_or(defaults.key_seed),
            server_port: parsed_var("PORT").unwrap_or(defaults.server_port),
            cleanup_interval: positive_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            exchange: env::var("BROKER_EXCHANGE").unwrap_or(defaults.exchange),
            routing_key: env::var("BROKER_ROUTING_KEY").unwrap_or(defaults.routing_key),
            view_window: parsed_var("VIEW_WINDOW").unwrap_or(defaults.view_window),
        }
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }

    pub fn binding(&self) -> Binding {
        Binding::new(self.exchange.clone(), self.routing_key.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            key_seed: DEFAULT_KEY_SEED,
            server_port: 3000,
            cleanup_interval: 60,
            exchange: "records".to_string(),
            routing_key: "records.ingest".to_string(),
            view_window: DEFAULT_VIEW_WINDOW,
        }
    }
}

fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn positive_var<T: FromStr + PartialOrd + Default>(name: &str) -> Option<T> {
    parsed_var(name).filter(|v: &T| *v > T::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity, 500);
        assert_eq!(config.max_age(), Duration::from_secs(15 * 60));
        assert_eq!(config.key_seed, 1);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.view_window, 15);
        assert_eq!(config.binding(), Binding::new("records", "records.ingest"));
    }

    // Single test touching the environment so parallel tests cannot race on it
    #[test]
    fn test_config_from_env() {
        let vars = [
            "CACHE_CAPACITY",
            "CACHE_MAX_AGE",
            "KEY_SEED",
            "PORT",
            "CLEANUP_INTERVAL",
            "BROKER_EXCHANGE",
            "BROKER_ROUTING_KEY",
            "VIEW_WINDOW",
        ];
        for var in vars {
            env::remove_var(var);
        }
        assert_eq!(Config::from_env(), Config::default());

        env::set_var("CACHE_CAPACITY", "25");
        env::set_var("CACHE_MAX_AGE", "0");
        env::set_var("KEY_SEED", "0");
        env::set_var("PORT", "not-a-port");
        env::set_var("BROKER_EXCHANGE", "ledger");

        let config = Config::from_env();
        assert_eq!(config.capacity, 25);
        assert_eq!(config.max_age_secs, DEFAULT_MAX_AGE_SECS);
        assert_eq!(config.key_seed, 0);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.exchange, "ledger");

        for var in vars {
            env::remove_var(var);
        }
    }
}
