//! # Pulse API
//!
//! Read-only HTTP service over the tweet search index.
//!
//! ## Architecture
//!
//! The service is a thin axum layer over the repository's search client:
//!
//! 1. **Router** (`api`): one handler per endpoint, translating query
//!    parameters into typed search requests
//! 2. **Cache** (`cache`): time-boxed in-memory cache fronting the
//!    aggregation endpoints
//! 3. **Search client** (`pulse-repository`): trait-based access to the
//!    index so handlers can be tested against mocks
//!
//! ## Modules
//!
//! - `api`: HTTP handlers and parameter types
//! - `cache`: response cache for aggregations
//! - `config`: environment-derived settings
//! - `errors`: handler error type with HTTP status mapping

pub mod api;
pub mod cache;
pub mod config;
pub mod errors;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use pulse_repository::TweetSearchClient;

use crate::cache::ResponseCache;

/// Top-level error for the API service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failure binding or running the HTTP server
    #[error("Server error: {0}")]
    ServerError(String),
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a server error.
    pub fn server(msg: impl Into<String>) -> Self {
        Self::ServerError(msg.into())
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Read-side search client
    pub search: Arc<dyn TweetSearchClient>,
    /// Response cache for aggregation endpoints
    pub cache: Arc<ResponseCache>,
}

impl AppState {
    /// Create new application state
    pub fn new(search: Arc<dyn TweetSearchClient>, cache: Arc<ResponseCache>) -> Self {
        Self { search, cache }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::health_check))
        .route("/tweets", get(api::get_tweets))
        .route("/tweets/:id", get(api::get_tweet_by_id))
        .route("/trends", get(api::get_trends))
        .route("/regions", get(api::get_regions))
        .route("/sentiment", get(api::get_sentiment))
        .route("/map-data", get(api::get_map_data))
        .with_state(state)
}

/// Build the CORS layer from the configured origins.
///
/// `*` allows any origin; otherwise the value is treated as a comma-separated
/// origin list and entries that fail to parse are skipped with a warning.
pub fn cors_layer(origins: &str) -> CorsLayer {
    if origins.trim() == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .split(',')
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any)
}
