//! Source store access.
//!
//! The source store is an HTTP service whose snapshot endpoint returns the
//! full current list of records as a JSON array.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::errors::CollectorError;

/// Abstracts the store the poller reads from.
///
/// Records come back as raw JSON values; the collector only interprets the
/// `id` field and forwards the rest untouched.
#[async_trait]
pub trait SourceStore: Send + Sync {
    /// Fetch the full current snapshot of records.
    async fn fetch_snapshot(&self) -> Result<Vec<Value>, CollectorError>;
}

/// HTTP implementation of [`SourceStore`].
pub struct HttpSourceStore {
    client: reqwest::Client,
    url: String,
}

impl HttpSourceStore {
    /// Create a source store client for the given snapshot URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl SourceStore for HttpSourceStore {
    async fn fetch_snapshot(&self) -> Result<Vec<Value>, CollectorError> {
        debug!(url = %self.url, "Fetching snapshot from source");

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::source(format!(
                "Snapshot request failed with status {}",
                status
            )));
        }

        let records = response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| CollectorError::parse(e.to_string()))?;

        debug!(count = records.len(), "Fetched snapshot from source");
        Ok(records)
    }
}
