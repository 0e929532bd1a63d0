//! Message types for the consumer.
//!
//! Defines the messages that flow from the consumer to the pipeline runner.

/// Messages that flow through the pipeline channel.
#[derive(Debug)]
pub enum StreamMessage {
    /// A raw record payload from Kafka. `None` when the broker message
    /// carried no payload.
    Record(Option<Vec<u8>>),
    /// An error occurred on the stream.
    Error(String),
    /// Stream has ended.
    End,
}
