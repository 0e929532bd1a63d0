//! Pulse Collector entrypoint.
//!
//! Wires the HTTP source store to the Kafka publisher and runs the poll
//! loop until interrupted.

use std::env;
use std::sync::Arc;

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pulse_collector::{
    Collector, CollectorConfig, CollectorError, HttpSourceStore, KafkaRecordPublisher,
};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), CollectorError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pulse_collector=info,pulse_kafka=info"));

    let log_format = env::var("LOG_FORMAT").unwrap_or_default();

    if log_format == "json" {
        // JSON format for structured logging
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "pulse-collector",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        // Pretty console output for local development
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "pulse-collector",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), CollectorError> {
    dotenv().ok();
    init_tracing()?;

    info!("Starting Pulse Collector");

    let config = CollectorConfig::from_env()?;
    info!(
        source_url = %config.source_url,
        kafka_broker = %config.kafka_broker,
        raw_topic = %config.raw_topic,
        poll_interval_secs = config.poll_interval.as_secs(),
        "Collector configured"
    );

    let producer = match pulse_kafka::create_future_producer(&config.kafka_broker, "pulse-collector")
    {
        Ok(producer) => producer,
        Err(e) => {
            error!(error = %e, "Failed to create Kafka producer");
            return Err(CollectorError::publish(e.to_string()));
        }
    };

    let source = Arc::new(HttpSourceStore::new(&config.source_url));
    let publisher = Arc::new(KafkaRecordPublisher::new(producer, &config.raw_topic));

    let mut collector = Collector::new(source, publisher);
    collector.run(config.poll_interval).await;

    info!("Pulse Collector stopped");
    Ok(())
}
