//! Environment-backed settings for the processor.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::PipelineError;

/// Default Kafka broker address.
const DEFAULT_KAFKA_BROKER: &str = "localhost:9092";

/// Default topic carrying raw records.
const DEFAULT_RAW_TOPIC: &str = "raw-tweets";

/// Default topic for enriched records.
const DEFAULT_PROCESSED_TOPIC: &str = "processed-tweets";

/// Default consumer group id.
const DEFAULT_KAFKA_GROUP_ID: &str = "pulse-processor";

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default interval between pipeline cycles in continuous mode.
const DEFAULT_PROCESSING_INTERVAL_SECS: u64 = 60;

/// Parse a boolean environment flag. Accepts "true" and "1".
fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1")
}

/// Processor configuration.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Kafka broker address.
    pub kafka_broker: String,
    /// Topic carrying raw records.
    pub raw_topic: String,
    /// Topic for enriched records.
    pub processed_topic: String,
    /// Base consumer group id.
    pub group_id: String,
    /// OpenSearch server URL.
    pub opensearch_url: String,
    /// Name of the search index.
    pub index_name: String,
    /// Whether to restart the pipeline after it completes.
    pub continuous_mode: bool,
    /// Pause between pipeline cycles in continuous mode.
    pub processing_interval: Duration,
    /// Optional path to a sentiment lexicon file.
    pub sentiment_lexicon: Option<PathBuf>,
}

impl ProcessorConfig {
    /// Load configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `KAFKA_BROKER` - Kafka broker address (default: localhost:9092)
    /// - `KAFKA_RAW_TOPIC` - Topic carrying raw records (default: raw-tweets)
    /// - `KAFKA_PROCESSED_TOPIC` - Topic for enriched records (default: processed-tweets)
    /// - `KAFKA_GROUP_ID` - Consumer group id (default: pulse-processor)
    /// - `KAFKA_OFFSET_MODE` - "replay" or "resume", read by the consumer setup
    /// - `OPENSEARCH_URL` - OpenSearch server URL (default: http://localhost:9200)
    /// - `INDEX_NAME` - Search index name (default: tweets)
    /// - `CONTINUOUS_MODE` - Restart after each cycle when "true" or "1"
    /// - `PROCESSING_INTERVAL_SECS` - Pause between cycles (default: 60)
    /// - `SENTIMENT_LEXICON` - Path to a lexicon file (optional)
    ///
    /// # Returns
    ///
    /// * `Ok(ProcessorConfig)` - The loaded configuration
    /// * `Err(PipelineError)` - If a variable is set but unparseable
    pub fn from_env() -> Result<Self, PipelineError> {
        let processing_interval_secs = match env::var("PROCESSING_INTERVAL_SECS") {
            Ok(value) => value.parse::<u64>().map_err(|_| {
                PipelineError::config(format!("Invalid PROCESSING_INTERVAL_SECS: {value}"))
            })?,
            Err(_) => DEFAULT_PROCESSING_INTERVAL_SECS,
        };

        Ok(Self {
            kafka_broker: env::var("KAFKA_BROKER")
                .unwrap_or_else(|_| DEFAULT_KAFKA_BROKER.to_string()),
            raw_topic: env::var("KAFKA_RAW_TOPIC")
                .unwrap_or_else(|_| DEFAULT_RAW_TOPIC.to_string()),
            processed_topic: env::var("KAFKA_PROCESSED_TOPIC")
                .unwrap_or_else(|_| DEFAULT_PROCESSED_TOPIC.to_string()),
            group_id: env::var("KAFKA_GROUP_ID")
                .unwrap_or_else(|_| DEFAULT_KAFKA_GROUP_ID.to_string()),
            opensearch_url: env::var("OPENSEARCH_URL")
                .unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string()),
            index_name: env::var("INDEX_NAME")
                .unwrap_or_else(|_| pulse_repository::opensearch::DEFAULT_INDEX_NAME.to_string()),
            continuous_mode: env::var("CONTINUOUS_MODE")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            processing_interval: Duration::from_secs(processing_interval_secs),
            sentiment_lexicon: env::var("SENTIMENT_LEXICON").ok().map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(parse_flag(" true "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }
}
