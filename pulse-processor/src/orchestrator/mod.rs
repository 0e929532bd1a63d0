//! Orchestrator module for the enrichment pipeline.
//!
//! Coordinates the consumer, enrichment stages, publisher, and loader.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, Duration};
use tracing::{error, info, instrument, warn};

use pulse_shared::TweetRecord;

use crate::consumer::StreamMessage;
use crate::enrich::EnrichmentPipeline;
use crate::errors::ProcessorError;
use crate::loader::IndexLoader;
use crate::publisher::ProcessedPublisher;

/// Source of raw record payloads for the runner.
#[async_trait]
pub trait RecordConsumer: Send + Sync {
    /// Subscribe to the raw topic.
    fn subscribe(&self) -> Result<(), ProcessorError>;

    /// Stream messages into the channel until shutdown or end of stream.
    async fn run(
        &self,
        sender: mpsc::Sender<StreamMessage>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ProcessorError>;
}

/// Lifecycle states of the pipeline runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// Created but not yet started.
    Starting,
    /// Subscribed to the raw topic.
    Connected,
    /// Processing records.
    Running,
    /// Finished cleanly.
    Stopped,
    /// Stopped on an unrecoverable error.
    Crashed,
}

/// How a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The raw stream ended.
    Completed,
    /// A shutdown signal ended the run.
    Interrupted,
}

/// Configuration for the pipeline runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Size of the message channel buffer.
    pub channel_buffer_size: usize,
    /// Interval between progress log lines.
    pub heartbeat_interval: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: 1000,
            heartbeat_interval: Duration::from_secs(10),
        }
    }
}

/// Runner that coordinates the pipeline components.
///
/// The runner:
/// - Manages the lifecycle of the pipeline components
/// - Routes raw payloads from the consumer through the stages
/// - Republishes and indexes every enriched record
/// - Handles shutdown signals
/// - Monitors pipeline health
pub struct PipelineRunner {
    consumer: Arc<dyn RecordConsumer>,
    pipeline: EnrichmentPipeline,
    publisher: Box<dyn ProcessedPublisher>,
    loader: IndexLoader,
    config: RunnerConfig,
    state: RunnerState,
    shutdown_tx: broadcast::Sender<()>,
    /// Total number of records processed since startup.
    total_processed: Arc<AtomicU64>,
}

impl PipelineRunner {
    /// Create a new runner with the given components.
    pub fn new(
        consumer: Arc<dyn RecordConsumer>,
        pipeline: EnrichmentPipeline,
        publisher: Box<dyn ProcessedPublisher>,
        loader: IndexLoader,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            consumer,
            pipeline,
            publisher,
            loader,
            config: RunnerConfig::default(),
            state: RunnerState::Starting,
            shutdown_tx,
            total_processed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a new runner with custom configuration.
    pub fn with_config(
        consumer: Arc<dyn RecordConsumer>,
        pipeline: EnrichmentPipeline,
        publisher: Box<dyn ProcessedPublisher>,
        loader: IndexLoader,
        config: RunnerConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            consumer,
            pipeline,
            publisher,
            loader,
            config,
            state: RunnerState::Starting,
            shutdown_tx,
            total_processed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The runner's current lifecycle state.
    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Total number of records processed since startup.
    pub fn total_processed(&self) -> u64 {
        self.total_processed.load(Ordering::Relaxed)
    }

    /// Run the pipeline.
    ///
    /// Subscribes to the raw topic, resets the search index, and processes
    /// records until the stream ends or a shutdown signal arrives. A failed
    /// subscribe or a failed publish ends the run with an error.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<RunOutcome, ProcessorError> {
        info!("Starting enrichment pipeline runner");

        if let Err(e) = self.consumer.subscribe() {
            self.state = RunnerState::Crashed;
            return Err(e);
        }
        self.state = RunnerState::Connected;

        // Every cycle starts from a fresh, empty index.
        self.loader.reset().await;

        let (event_transmitter, mut event_receiver) =
            mpsc::channel::<StreamMessage>(self.config.channel_buffer_size);

        // Start consumer in background
        let consumer = self.consumer.clone();
        let shutdown_rx = self.shutdown_tx.subscribe();

        let consumer_handle = tokio::spawn(async move {
            if let Err(e) = consumer.run(event_transmitter, shutdown_rx).await {
                error!(error = %e, "Consumer error");
            }
        });

        self.state = RunnerState::Running;
        info!("Ready to process records from Kafka");

        // Set up progress logging timer
        let total = Arc::clone(&self.total_processed);
        let mut heartbeat = interval(self.config.heartbeat_interval);
        heartbeat.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Track previous values for rate calculation
        let mut prev_count: u64 = 0;
        let mut prev_time = std::time::Instant::now();

        let outcome = loop {
            tokio::select! {
                msg = event_receiver.recv() => {
                    match msg {
                        Some(StreamMessage::Record(Some(payload))) => {
                            if let Err(e) = self.handle_record(&payload).await {
                                error!(error = %e, "Failed to process record");
                                break Err(e);
                            }
                        }
                        Some(StreamMessage::Record(None)) => {
                            warn!("Received message with empty payload, skipping");
                        }
                        Some(StreamMessage::Error(e)) => {
                            error!(error = %e, "Received error from consumer");
                            break Err(ProcessorError::kafka(e));
                        }
                        Some(StreamMessage::End) | None => {
                            info!("Consumer stream ended");
                            break Ok(RunOutcome::Completed);
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break Ok(RunOutcome::Interrupted);
                }
                _ = heartbeat.tick() => {
                    let count = total.load(Ordering::Relaxed);

                    // Calculate rate per second
                    let now = std::time::Instant::now();
                    let elapsed_secs = now.duration_since(prev_time).as_secs_f64();

                    let records_per_sec = if elapsed_secs > 0.0 {
                        (count.saturating_sub(prev_count) as f64) / elapsed_secs
                    } else {
                        0.0
                    };

                    info!(
                        records_processed = count,
                        records_per_sec = format!("{:.2}", records_per_sec),
                        "Processing progress"
                    );

                    prev_count = count;
                    prev_time = now;
                }
            }
        };

        // Stop the consumer task; closing the channel unblocks any send in
        // flight, and the broadcast covers a consumer waiting on its stream.
        let _ = self.shutdown_tx.send(());
        drop(event_receiver);

        // Drain the producer so records published this cycle reach the broker.
        self.publisher.flush();

        let _ = consumer_handle.await;

        let final_count = self.total_processed.load(Ordering::Relaxed);
        match outcome {
            Ok(outcome) => {
                self.state = RunnerState::Stopped;
                info!(
                    total_processed = final_count,
                    outcome = ?outcome,
                    "Pipeline runner stopped"
                );
                Ok(outcome)
            }
            Err(e) => {
                self.state = RunnerState::Crashed;
                error!(
                    total_processed = final_count,
                    error = %e,
                    "Pipeline runner crashed"
                );
                Err(e)
            }
        }
    }

    /// Process one raw payload end to end.
    ///
    /// Unparseable payloads are logged and skipped. A publish failure is
    /// returned to the caller and ends the run; an index write failure is
    /// absorbed by the loader.
    async fn handle_record(&self, payload: &[u8]) -> Result<(), ProcessorError> {
        let record: TweetRecord = match serde_json::from_slice(payload) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Skipping malformed record");
                return Ok(());
            }
        };

        let mut enriched = self.pipeline.enrich(record);
        enriched.processed = Some(true);
        enriched.processed_at = Some(Utc::now());

        self.publisher.publish(&enriched)?;
        self.loader.store(&enriched).await;

        self.total_processed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Trigger a graceful shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}
