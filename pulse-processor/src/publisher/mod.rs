//! Publisher module for enriched records.
//!
//! Republishes enriched records to the processed topic.

use std::time::Duration;

use tracing::{debug, warn};

use pulse_kafka::{BaseProducer, BaseRecord, Producer};
use pulse_shared::TweetRecord;

use crate::errors::ProcessorError;

/// Flush timeout when draining buffered messages.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Publishes enriched records downstream.
pub trait ProcessedPublisher: Send + Sync {
    /// Publish one enriched record.
    fn publish(&self, record: &TweetRecord) -> Result<(), ProcessorError>;

    /// Drain buffered messages. Called when the pipeline stops.
    fn flush(&self);
}

/// Kafka publisher for the processed topic.
///
/// Messages are keyed by record id so reprocessed records land on the same
/// partition as their earlier versions.
pub struct KafkaProcessedPublisher {
    producer: BaseProducer,
    topic: String,
}

impl KafkaProcessedPublisher {
    pub fn new(producer: BaseProducer, topic: impl Into<String>) -> Self {
        Self {
            producer,
            topic: topic.into(),
        }
    }
}

impl ProcessedPublisher for KafkaProcessedPublisher {
    fn publish(&self, record: &TweetRecord) -> Result<(), ProcessorError> {
        let payload = serde_json::to_string(record)
            .map_err(|e| ProcessorError::parse(format!("Failed to serialize record: {e}")))?;
        let key = record.document_id();

        let message = BaseRecord::to(&self.topic).key(&key).payload(&payload);

        self.producer
            .send(message)
            .map_err(|(e, _)| ProcessorError::publish(e.to_string()))?;

        // Serve queued delivery reports so they do not accumulate.
        self.producer.poll(Duration::ZERO);

        debug!(id = %key, topic = %self.topic, "Published enriched record");
        Ok(())
    }

    fn flush(&self) {
        if let Err(e) = self.producer.flush(FLUSH_TIMEOUT) {
            warn!(error = %e, "Failed to flush producer");
        }
    }
}
