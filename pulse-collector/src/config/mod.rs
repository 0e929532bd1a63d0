//! Environment-driven configuration for the collector.

use std::env;
use std::time::Duration;

use crate::errors::CollectorError;

/// Default source store URL.
const DEFAULT_SOURCE_URL: &str = "http://localhost:3000/tweets";

/// Default Kafka broker address.
const DEFAULT_KAFKA_BROKER: &str = "localhost:9092";

/// Default topic for raw records.
const DEFAULT_RAW_TOPIC: &str = "raw-tweets";

/// Default polling interval in seconds.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Collector configuration.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// URL of the source store snapshot endpoint.
    pub source_url: String,
    /// Kafka broker address.
    pub kafka_broker: String,
    /// Topic for raw records.
    pub raw_topic: String,
    /// Time between poll ticks.
    pub poll_interval: Duration,
}

impl CollectorConfig {
    /// Load configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `SOURCE_URL` - Source store snapshot endpoint
    /// - `KAFKA_BROKER` - Kafka broker address
    /// - `KAFKA_RAW_TOPIC` - Topic for raw records
    /// - `POLL_INTERVAL_SECS` - Seconds between poll ticks
    ///
    /// # Returns
    ///
    /// * `Ok(CollectorConfig)` - The loaded configuration
    /// * `Err(CollectorError)` - If a variable is set but unparseable
    pub fn from_env() -> Result<Self, CollectorError> {
        let poll_interval_secs = match env::var("POLL_INTERVAL_SECS") {
            Ok(value) => value.parse::<u64>().map_err(|_| {
                CollectorError::config(format!("Invalid POLL_INTERVAL_SECS: {value}"))
            })?,
            Err(_) => DEFAULT_POLL_INTERVAL_SECS,
        };

        Ok(Self {
            source_url: env::var("SOURCE_URL").unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string()),
            kafka_broker: env::var("KAFKA_BROKER")
                .unwrap_or_else(|_| DEFAULT_KAFKA_BROKER.to_string()),
            raw_topic: env::var("KAFKA_RAW_TOPIC")
                .unwrap_or_else(|_| DEFAULT_RAW_TOPIC.to_string()),
            poll_interval: Duration::from_secs(poll_interval_secs),
        })
    }
}
