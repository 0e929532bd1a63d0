//! # Pulse Processor
//!
//! Enrichment pipeline for the pulse platform - consumes raw tweet records
//! from Kafka, enriches them, republishes the enriched records, and indexes
//! them into OpenSearch.
//!
//! ## Architecture
//!
//! The processor follows the Consumer-Pipeline-Loader pattern:
//!
//! 1. **Consumer**: Receives raw records from Kafka
//! 2. **Pipeline**: Runs the enrichment stages over each record
//! 3. **Publisher**: Republishes enriched records to Kafka
//! 4. **Loader**: Indexes enriched records into OpenSearch
//! 5. **Orchestrator**: Coordinates the flow and the runner lifecycle
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`consumer`]: Kafka consumer for raw records
//! - [`enrich`]: The enrichment stages (hashtags, location, sentiment)
//! - [`publisher`]: Kafka publisher for enriched records
//! - [`loader`]: Indexes enriched records into OpenSearch
//! - [`orchestrator`]: Coordinates the flow
//! - [`errors`]: Error types for the processor

pub mod config;
pub mod consumer;
pub mod enrich;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod publisher;

pub use config::{Dependencies, ProcessorConfig};
pub use errors::ProcessorError;

use thiserror::Error;

/// Errors that can occur during processor initialization or execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Processor error.
    #[error("Processor error: {0}")]
    ProcessorError(#[from] ProcessorError),
}

impl PipelineError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
