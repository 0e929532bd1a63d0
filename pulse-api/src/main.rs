//! Pulse API Main Entry Point
//!
//! This is the main binary for the Pulse query API. It serves tweets,
//! trending hashtags, region counts, sentiment distribution and map data
//! from the search index over HTTP.

use std::env;
use std::sync::Arc;

use dotenv::dotenv;
use pulse_api::cache::ResponseCache;
use pulse_api::config::ApiConfig;
use pulse_api::{build_router, cors_layer, AppState, ServiceError};
use pulse_repository::{IndexConfig, OpenSearchProvider};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), ServiceError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pulse_api=info"));

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
            service_name = "pulse-api",
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
            service_name = "pulse-api",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize tracing
    init_tracing()?;

    info!("Starting Pulse API");

    let config = ApiConfig::from_env()?;

    info!(
        opensearch_url = %config.opensearch_url,
        index_name = %config.index_name,
        bind_addr = %config.bind_addr,
        cache_enabled = config.cache_enabled,
        "API configured"
    );

    let index_config = IndexConfig::new(config.index_name.as_str());
    let provider = OpenSearchProvider::new(&config.opensearch_url, index_config)
        .await
        .map_err(|e| {
            ServiceError::config(format!("Failed to create OpenSearch provider: {}", e))
        })?;

    // The API may start before the index exists; queries fail cleanly until
    // the processor has run.
    match provider.ping().await {
        Ok(()) => info!("Connected to search backend"),
        Err(e) => warn!(error = %e, "Search backend not reachable yet"),
    }

    let cache = ResponseCache::new(config.cache_enabled, config.cache_ttl);
    let state = AppState::new(Arc::new(provider), Arc::new(cache));
    let app = build_router(state).layer(cors_layer(&config.cors_origins));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| ServiceError::server(format!("Failed to bind {}: {}", config.bind_addr, e)))?;

    info!(addr = %config.bind_addr, "Pulse API listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| ServiceError::server(e.to_string()))?;

    Ok(())
}
