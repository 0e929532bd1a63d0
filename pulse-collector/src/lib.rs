//! # Pulse Collector
//!
//! Collector for the tweet pulse pipeline - polls the source store for new
//! records and publishes them to the raw Kafka topic.
//!
//! ## Architecture
//!
//! The collector follows a simple poll-filter-publish flow:
//!
//! 1. **Source**: Fetches the full current snapshot from the source store
//! 2. **Collector**: Filters records by a monotonic high-water mark
//! 3. **Publisher**: Publishes new records to Kafka with delivery confirmation
//!
//! ## Modules
//!
//! - [`collector`]: The polling loop and high-water mark logic
//! - [`config`]: Environment-driven configuration
//! - [`publisher`]: Kafka publisher for raw records
//! - [`source`]: HTTP access to the source store
//! - [`errors`]: Error types for the collector

pub mod collector;
pub mod config;
pub mod errors;
pub mod publisher;
pub mod source;

pub use collector::Collector;
pub use config::CollectorConfig;
pub use errors::CollectorError;
pub use publisher::{KafkaRecordPublisher, RecordPublisher};
pub use source::{HttpSourceStore, SourceStore};
