//! Consumer module for the processor.
//!
//! Provides Kafka consumer functionality for receiving raw tweet records.

mod kafka_consumer;
mod messages;

pub use kafka_consumer::KafkaRecordConsumer;
pub use messages::StreamMessage;
