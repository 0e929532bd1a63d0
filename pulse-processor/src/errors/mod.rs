//! Error types for the enrichment processor.

use thiserror::Error;

/// Errors that can occur in the processor flow.
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// Kafka-related error.
    #[error("Kafka error: {0}")]
    KafkaError(String),

    /// Error parsing or decoding data.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Channel communication error.
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// Error publishing an enriched record.
    #[error("Publish error: {0}")]
    PublishError(String),
}

impl ProcessorError {
    /// Create a Kafka error.
    pub fn kafka(msg: impl Into<String>) -> Self {
        Self::KafkaError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::ChannelError(msg.into())
    }

    /// Create a publish error.
    pub fn publish(msg: impl Into<String>) -> Self {
        Self::PublishError(msg.into())
    }
}

impl From<pulse_kafka::KafkaError> for ProcessorError {
    fn from(err: pulse_kafka::KafkaError) -> Self {
        Self::KafkaError(err.to_string())
    }
}

/// Failure of a single enrichment stage.
///
/// Stage failures are absorbed by the pipeline, which falls back to the
/// stage's default output instead of dropping the record.
#[derive(Error, Debug)]
pub enum StageError {
    /// The stage could not produce its enrichment for this record.
    #[error("Stage failed: {0}")]
    Failed(String),
}

impl StageError {
    /// Create a stage failure.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}
