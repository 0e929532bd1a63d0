//! Kafka consumer implementation for the processor.
//!
//! Consumes raw tweet records from the raw topic and forwards their payloads
//! to the pipeline runner.

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, instrument};

use pulse_kafka::{Consumer, ConsumerConfig, Message, StreamConsumer};

use crate::consumer::messages::StreamMessage;
use crate::errors::ProcessorError;
use crate::orchestrator::RecordConsumer;

/// Kafka consumer for raw tweet records.
pub struct KafkaRecordConsumer {
    consumer: StreamConsumer,
    topic: String,
}

impl KafkaRecordConsumer {
    /// Create a new Kafka consumer.
    ///
    /// # Arguments
    ///
    /// * `config` - Broker, group and offset-mode configuration
    /// * `topic` - The raw topic to consume
    ///
    /// # Returns
    ///
    /// * `Ok(KafkaRecordConsumer)` - A new consumer instance
    /// * `Err(ProcessorError)` - If consumer creation fails
    pub fn new(config: &ConsumerConfig, topic: impl Into<String>) -> Result<Self, ProcessorError> {
        let consumer = pulse_kafka::create_stream_consumer(config)
            .map_err(|e| ProcessorError::kafka(e.to_string()))?;

        let topic = topic.into();
        info!(
            broker = %config.broker,
            group_id = %config.group_id,
            offset_mode = config.offset_mode.as_str(),
            topic = %topic,
            "Created Kafka consumer"
        );

        Ok(Self { consumer, topic })
    }
}

#[async_trait]
impl RecordConsumer for KafkaRecordConsumer {
    fn subscribe(&self) -> Result<(), ProcessorError> {
        self.consumer
            .subscribe(&[self.topic.as_str()])
            .map_err(|e| ProcessorError::kafka(e.to_string()))?;

        info!(topic = %self.topic, "Subscribed to Kafka topic");
        Ok(())
    }

    /// Start consuming messages and send them through the channel.
    ///
    /// Runs until the stream ends or a shutdown signal arrives. Offsets are
    /// committed automatically on an interval, independent of what the
    /// receiver does with each record.
    #[instrument(skip(self, sender, shutdown))]
    async fn run(
        &self,
        sender: mpsc::Sender<StreamMessage>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ProcessorError> {
        use futures::StreamExt;

        let mut message_stream = self.consumer.stream();

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Consumer received shutdown signal");
                    let _ = sender.send(StreamMessage::End).await;
                    break;
                }
                message = message_stream.next() => {
                    match message {
                        Some(Ok(msg)) => {
                            debug!(
                                topic = %msg.topic(),
                                partition = msg.partition(),
                                offset = msg.offset(),
                                "Received message from Kafka"
                            );
                            let payload = msg.payload().map(|p| p.to_vec());
                            sender
                                .send(StreamMessage::Record(payload))
                                .await
                                .map_err(|e| ProcessorError::channel(e.to_string()))?;
                        }
                        Some(Err(e)) => {
                            error!(error = %e, "Kafka error");
                            let _ = sender.send(StreamMessage::Error(e.to_string())).await;
                        }
                        None => {
                            info!("Kafka stream ended");
                            let _ = sender.send(StreamMessage::End).await;
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
