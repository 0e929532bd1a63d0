//! Raw record publishing.
//!
//! Publishes source records to the raw topic and waits for broker
//! acknowledgment, so the collector only advances its high-water mark past
//! records the queue has durably accepted.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use pulse_kafka::{FutureProducer, FutureRecord};

use crate::errors::CollectorError;

/// How long a publish may wait for delivery confirmation.
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

/// Abstracts the queue the poller publishes raw records to.
#[async_trait]
pub trait RecordPublisher: Send + Sync {
    /// Publish one record and wait for broker acknowledgment.
    async fn publish(&self, record: &Value) -> Result<(), CollectorError>;
}

/// Kafka implementation of [`RecordPublisher`].
///
/// Uses the record id as the message key for partitioning.
pub struct KafkaRecordPublisher {
    producer: FutureProducer,
    topic: String,
}

impl KafkaRecordPublisher {
    /// Create a publisher for the given topic.
    pub fn new(producer: FutureProducer, topic: impl Into<String>) -> Self {
        Self {
            producer,
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl RecordPublisher for KafkaRecordPublisher {
    async fn publish(&self, record: &Value) -> Result<(), CollectorError> {
        let payload =
            serde_json::to_string(record).map_err(|e| CollectorError::parse(e.to_string()))?;

        let key = record
            .get("id")
            .map(|id| match id {
                Value::String(id) => id.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default();

        let message = FutureRecord::to(&self.topic).key(&key).payload(&payload);

        self.producer
            .send(message, PUBLISH_TIMEOUT)
            .await
            .map_err(|(e, _)| CollectorError::publish(e.to_string()))?;

        debug!(key = %key, topic = %self.topic, "Record published");
        Ok(())
    }
}
