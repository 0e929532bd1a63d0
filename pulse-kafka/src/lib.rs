//! Shared Kafka utilities for the pulse pipeline.
//!
//! This crate provides common Kafka producer and consumer configuration
//! used by the collector and processor binaries.
//!
//! ## Usage
//!
//! ```ignore
//! use pulse_kafka::{create_producer, ConsumerConfig, create_stream_consumer};
//!
//! // Producer for the collector
//! let producer = create_producer("localhost:9092", "pulse-collector")?;
//!
//! // Consumer for the processor
//! let config = ConsumerConfig::from_env("localhost:9092", "pulse-processor");
//! let consumer = create_stream_consumer(&config)?;
//! ```

use std::env;

use anyhow::Result;
use rdkafka::config::ClientConfig;
use tracing::warn;
use uuid::Uuid;

/// Configuration for creating a Kafka producer.
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Kafka broker address (e.g., "localhost:9092")
    pub broker: String,
    /// Client ID for this producer
    pub client_id: String,
    /// SASL username (enables SASL/SSL if set)
    pub username: Option<String>,
    /// SASL password (required if username is set)
    pub password: Option<String>,
    /// Custom CA certificate in PEM format
    pub ssl_ca_pem: Option<String>,
}

impl ProducerConfig {
    /// Create a new ProducerConfig with the given broker and client_id.
    pub fn new(broker: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            broker: broker.into(),
            client_id: client_id.into(),
            username: None,
            password: None,
            ssl_ca_pem: None,
        }
    }

    /// Create a ProducerConfig from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `KAFKA_BROKER` - Broker address (uses provided default if not set)
    /// - `KAFKA_USERNAME` - SASL username (optional)
    /// - `KAFKA_PASSWORD` - SASL password (optional)
    /// - `KAFKA_SSL_CA_PEM` - Custom CA cert in PEM format (optional)
    pub fn from_env(default_broker: &str, client_id: impl Into<String>) -> Self {
        Self {
            broker: env::var("KAFKA_BROKER").unwrap_or_else(|_| default_broker.to_string()),
            client_id: client_id.into(),
            username: env::var("KAFKA_USERNAME").ok(),
            password: env::var("KAFKA_PASSWORD").ok(),
            ssl_ca_pem: env::var("KAFKA_SSL_CA_PEM").ok(),
        }
    }

    /// Set SASL credentials.
    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.username = Some(username);
        self.password = Some(password);
        self
    }

    /// Set custom CA certificate.
    pub fn with_ssl_ca(mut self, ca_pem: String) -> Self {
        self.ssl_ca_pem = Some(ca_pem);
        self
    }
}

/// Offset behavior for consumers when the processor starts.
///
/// `Replay` re-reads the raw topic from the beginning on every start by
/// joining under a fresh consumer group. `Resume` keeps the configured group
/// id so the consumer continues from its last committed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetMode {
    #[default]
    Replay,
    Resume,
}

impl OffsetMode {
    /// Parse a mode name. Accepts "replay" and "resume", case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "replay" => Some(OffsetMode::Replay),
            "resume" => Some(OffsetMode::Resume),
            _ => None,
        }
    }

    /// Read the mode from `KAFKA_OFFSET_MODE`, defaulting to `Replay`.
    ///
    /// Unrecognized values are logged and fall back to the default rather
    /// than failing startup.
    pub fn from_env() -> Self {
        match env::var("KAFKA_OFFSET_MODE") {
            Ok(value) => Self::parse(&value).unwrap_or_else(|| {
                warn!(
                    value = %value,
                    "Unrecognized KAFKA_OFFSET_MODE, defaulting to replay"
                );
                OffsetMode::Replay
            }),
            Err(_) => OffsetMode::Replay,
        }
    }

    /// The consumer group id to join under this mode.
    ///
    /// Replay appends a random suffix so the group has no committed offsets
    /// and `auto.offset.reset=earliest` takes effect.
    pub fn effective_group_id(&self, group_id: &str) -> String {
        match self {
            OffsetMode::Replay => format!("{}-{}", group_id, Uuid::new_v4().simple()),
            OffsetMode::Resume => group_id.to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OffsetMode::Replay => "replay",
            OffsetMode::Resume => "resume",
        }
    }
}

/// Configuration for creating a Kafka consumer.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Kafka broker address (e.g., "localhost:9092")
    pub broker: String,
    /// Base consumer group id; may be suffixed depending on `offset_mode`
    pub group_id: String,
    /// Offset behavior on start
    pub offset_mode: OffsetMode,
    /// SASL username (enables SASL/SSL if set)
    pub username: Option<String>,
    /// SASL password (required if username is set)
    pub password: Option<String>,
    /// Custom CA certificate in PEM format
    pub ssl_ca_pem: Option<String>,
}

impl ConsumerConfig {
    /// Create a new ConsumerConfig with the given broker and group id.
    pub fn new(broker: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            broker: broker.into(),
            group_id: group_id.into(),
            offset_mode: OffsetMode::default(),
            username: None,
            password: None,
            ssl_ca_pem: None,
        }
    }

    /// Create a ConsumerConfig from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `KAFKA_BROKER` - Broker address (uses provided default if not set)
    /// - `KAFKA_GROUP_ID` - Consumer group id (uses provided default if not set)
    /// - `KAFKA_OFFSET_MODE` - "replay" or "resume" (defaults to replay)
    /// - `KAFKA_USERNAME` - SASL username (optional)
    /// - `KAFKA_PASSWORD` - SASL password (optional)
    /// - `KAFKA_SSL_CA_PEM` - Custom CA cert in PEM format (optional)
    pub fn from_env(default_broker: &str, default_group_id: &str) -> Self {
        Self {
            broker: env::var("KAFKA_BROKER").unwrap_or_else(|_| default_broker.to_string()),
            group_id: env::var("KAFKA_GROUP_ID").unwrap_or_else(|_| default_group_id.to_string()),
            offset_mode: OffsetMode::from_env(),
            username: env::var("KAFKA_USERNAME").ok(),
            password: env::var("KAFKA_PASSWORD").ok(),
            ssl_ca_pem: env::var("KAFKA_SSL_CA_PEM").ok(),
        }
    }

    /// Set the offset mode.
    pub fn with_offset_mode(mut self, offset_mode: OffsetMode) -> Self {
        self.offset_mode = offset_mode;
        self
    }

    /// Set SASL credentials.
    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.username = Some(username);
        self.password = Some(password);
        self
    }
}

/// Apply SASL/SSL settings when credentials are present.
///
/// Without credentials the client stays on plaintext (local development).
fn apply_security(
    client_config: &mut ClientConfig,
    username: &Option<String>,
    password: &Option<String>,
    ssl_ca_pem: &Option<String>,
) {
    if let (Some(username), Some(password)) = (username, password) {
        client_config
            .set("security.protocol", "SASL_SSL")
            .set("sasl.mechanisms", "PLAIN")
            .set("sasl.username", username)
            .set("sasl.password", password);

        if let Some(ca_pem) = ssl_ca_pem {
            client_config.set("ssl.ca.pem", ca_pem);
        }
    }
}

fn producer_client_config(config: &ProducerConfig) -> ClientConfig {
    let mut client_config = ClientConfig::new();

    client_config
        .set("bootstrap.servers", &config.broker)
        .set("client.id", &config.client_id)
        .set("compression.type", "zstd")
        .set("message.timeout.ms", "5000")
        .set("queue.buffering.max.messages", "100000")
        .set("queue.buffering.max.kbytes", "1048576")
        .set("batch.num.messages", "10000");

    apply_security(
        &mut client_config,
        &config.username,
        &config.password,
        &config.ssl_ca_pem,
    );

    client_config
}

/// Create a Kafka producer with the given configuration.
///
/// Configures the producer with:
/// - zstd compression
/// - Optimized buffering settings for high throughput
/// - SASL/SSL authentication if credentials are provided
pub fn create_producer_with_config(
    config: &ProducerConfig,
) -> Result<rdkafka::producer::BaseProducer> {
    Ok(producer_client_config(config).create()?)
}

/// Create a Kafka producer using environment variables for configuration.
///
/// # Arguments
///
/// * `broker` - Kafka broker address
/// * `client_id` - Client ID for this producer
pub fn create_producer(broker: &str, client_id: &str) -> Result<rdkafka::producer::BaseProducer> {
    let config = ProducerConfig {
        broker: broker.to_string(),
        client_id: client_id.to_string(),
        username: env::var("KAFKA_USERNAME").ok(),
        password: env::var("KAFKA_PASSWORD").ok(),
        ssl_ca_pem: env::var("KAFKA_SSL_CA_PEM").ok(),
    };

    create_producer_with_config(&config)
}

/// Create an awaitable Kafka producer with the given configuration.
///
/// Same settings as [`create_producer_with_config`], but the returned
/// producer reports per-message delivery results. The collector uses this to
/// confirm a publish before advancing its high-water mark.
pub fn create_future_producer_with_config(
    config: &ProducerConfig,
) -> Result<rdkafka::producer::FutureProducer> {
    Ok(producer_client_config(config).create()?)
}

/// Create an awaitable Kafka producer using environment variables.
pub fn create_future_producer(
    broker: &str,
    client_id: &str,
) -> Result<rdkafka::producer::FutureProducer> {
    let config = ProducerConfig {
        broker: broker.to_string(),
        client_id: client_id.to_string(),
        username: env::var("KAFKA_USERNAME").ok(),
        password: env::var("KAFKA_PASSWORD").ok(),
        ssl_ca_pem: env::var("KAFKA_SSL_CA_PEM").ok(),
    };

    create_future_producer_with_config(&config)
}

/// Create a streaming Kafka consumer with the given configuration.
///
/// Offsets auto-commit on an interval. Downstream processing failures do not
/// hold offsets back; replay mode is the recovery path for reprocessing.
pub fn create_stream_consumer(config: &ConsumerConfig) -> Result<StreamConsumer> {
    let group_id = config.offset_mode.effective_group_id(&config.group_id);

    let mut client_config = ClientConfig::new();
    client_config
        .set("bootstrap.servers", &config.broker)
        .set("group.id", &group_id)
        .set("enable.auto.commit", "true")
        .set("auto.offset.reset", "earliest")
        .set("session.timeout.ms", "6000");

    apply_security(
        &mut client_config,
        &config.username,
        &config.password,
        &config.ssl_ca_pem,
    );

    Ok(client_config.create()?)
}

// Re-export commonly used rdkafka types for convenience
pub use rdkafka::consumer::{Consumer, StreamConsumer};
pub use rdkafka::error::KafkaError;
pub use rdkafka::message::{Header, Message, OwnedHeaders};
pub use rdkafka::producer::{BaseProducer, BaseRecord, FutureProducer, FutureRecord, Producer};
