//! Error types for the collector.

use thiserror::Error;

/// Errors that can occur during collection.
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The source store was unreachable or returned a non-success response.
    #[error("Source error: {0}")]
    SourceError(String),

    /// Failed to parse or serialize a record.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to publish a record to the queue.
    #[error("Publish error: {0}")]
    PublishError(String),
}

impl CollectorError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a source error.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a publish error.
    pub fn publish(msg: impl Into<String>) -> Self {
        Self::PublishError(msg.into())
    }
}

impl From<reqwest::Error> for CollectorError {
    fn from(e: reqwest::Error) -> Self {
        Self::SourceError(e.to_string())
    }
}
