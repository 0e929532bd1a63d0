//! Configuration management for the query API.
//!
//! All settings come from environment variables with sensible local-dev
//! defaults. Unparseable numeric values are startup errors.

use std::env;
use std::time::Duration;

use crate::ServiceError;

const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_CORS_ORIGINS: &str = "*";
const DEFAULT_CACHE_EXPIRY_SECS: u64 = 300;

/// Parse a boolean environment flag. Accepts "true" and "1".
fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1")
}

/// Query API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Search backend URL
    pub opensearch_url: String,
    /// Index to query
    pub index_name: String,
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Allowed CORS origins: `*` or a comma-separated list
    pub cors_origins: String,
    /// Whether aggregation responses are cached
    pub cache_enabled: bool,
    /// How long cached responses stay valid
    pub cache_ttl: Duration,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ServiceError> {
        let opensearch_url =
            env::var("OPENSEARCH_URL").unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string());

        let index_name = env::var("INDEX_NAME")
            .unwrap_or_else(|_| pulse_repository::opensearch::DEFAULT_INDEX_NAME.to_string());

        let bind_addr = env::var("API_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let cors_origins =
            env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string());

        // Caching is on unless explicitly turned off
        let cache_enabled = env::var("ENABLE_CACHE")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        let cache_ttl_secs = match env::var("CACHE_EXPIRY_SECS") {
            Ok(value) => value.parse::<u64>().map_err(|_| {
                ServiceError::config(format!("Invalid CACHE_EXPIRY_SECS value: {}", value))
            })?,
            Err(_) => DEFAULT_CACHE_EXPIRY_SECS,
        };

        Ok(Self {
            opensearch_url,
            index_name,
            bind_addr,
            cors_origins,
            cache_enabled,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(parse_flag(" True "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("yes"));
    }
}
