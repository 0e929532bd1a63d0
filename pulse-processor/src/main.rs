//! Pulse Processor Main Entry Point
//!
//! This is the main binary for the Pulse tweet processor. It consumes raw
//! tweets from Kafka, enriches them and republishes the results while also
//! loading them into the search index.

use dotenv::dotenv;
use pulse_processor::orchestrator::RunOutcome;
use pulse_processor::{Dependencies, PipelineError, ProcessorConfig};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), PipelineError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pulse_processor=info,pulse_kafka=info"));

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
            service_name = "pulse-processor",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        // Pretty console output by default
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "pulse-processor",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), PipelineError> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize tracing
    init_tracing()?;

    info!("Starting Pulse Processor");

    let config = ProcessorConfig::from_env()?;

    info!(
        continuous_mode = config.continuous_mode,
        interval_secs = config.processing_interval.as_secs(),
        "Processor configured"
    );

    if config.continuous_mode {
        // Each cycle gets fresh dependencies so the consumer group and the
        // search index start clean.
        loop {
            let mut deps = match Dependencies::new(&config).await {
                Ok(deps) => {
                    info!("Dependencies initialized successfully");
                    deps
                }
                Err(e) => {
                    error!(error = %e, "Failed to initialize dependencies");
                    return Err(e);
                }
            };

            match deps.runner.run().await {
                Ok(RunOutcome::Interrupted) => {
                    info!("Shutdown requested, leaving continuous mode");
                    break;
                }
                Ok(RunOutcome::Completed) => {
                    info!("Pipeline cycle completed");
                }
                Err(e) => {
                    error!(error = %e, "Pipeline cycle failed");
                }
            }

            info!(
                seconds = config.processing_interval.as_secs(),
                "Sleeping before next cycle"
            );
            tokio::time::sleep(config.processing_interval).await;
        }

        Ok(())
    } else {
        let mut deps = match Dependencies::new(&config).await {
            Ok(deps) => {
                info!("Dependencies initialized successfully");
                deps
            }
            Err(e) => {
                error!(error = %e, "Failed to initialize dependencies");
                return Err(e);
            }
        };

        match deps.runner.run().await {
            Ok(_) => {
                info!("Pulse processor completed successfully");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Pulse processor failed");
                Err(e.into())
            }
        }
    }
}
