//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `TweetIndexProvider`
//! and `TweetSearchClient` using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts},
    GetParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;

use pulse_shared::{
    MapData, MapPoint, MapQuery, RegionCount, RegionsSummary, SentimentSummary, TrendingHashtag,
    TrendsQuery, TrendsSummary, TweetPage, TweetQuery, TweetRecord,
};

use crate::errors::SearchIndexError;
use crate::interfaces::{TweetIndexProvider, TweetSearchClient};
use crate::opensearch::index_config::{get_index_settings, IndexConfig};
use crate::opensearch::queries;

/// OpenSearch provider implementation.
///
/// Serves both sides of the index: the processor writes through
/// `TweetIndexProvider` and the read API queries through `TweetSearchClient`.
///
/// # Example
///
/// ```ignore
/// use pulse_repository::opensearch::IndexConfig;
///
/// let config = IndexConfig::new("tweets");
/// let provider = OpenSearchProvider::new("http://localhost:9200", config).await?;
///
/// provider.reset_index().await?;
/// provider.index_document(&record).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index configuration containing the index name
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %index_config.name,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// Check that the backend is reachable.
    pub async fn ping(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::connection(format!(
                "Ping failed with status {}",
                status
            )));
        }

        Ok(())
    }

    /// Run a search request and return the parsed response body.
    async fn search(&self, body: Value) -> Result<Value, SearchIndexError> {
        let index = self.index_config.name.as_str();

        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::search(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchIndexError::search(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }
}

/// Total match count from a search response.
fn parse_total(body: &Value) -> u64 {
    body["hits"]["total"]["value"].as_u64().unwrap_or(0)
}

/// Extract records from search hits.
///
/// A document that no longer matches the record shape is logged and skipped
/// rather than failing the whole page.
fn parse_search_hits(body: &Value) -> Vec<TweetRecord> {
    let hits = match body["hits"]["hits"].as_array() {
        Some(hits) => hits,
        None => return Vec::new(),
    };

    hits.iter()
        .filter_map(
            |hit| match serde_json::from_value::<TweetRecord>(hit["_source"].clone()) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Skipping unparseable document in search response");
                    None
                }
            },
        )
        .collect()
}

/// Extract `(key, doc_count)` pairs from a terms aggregation.
fn parse_term_buckets(body: &Value, aggregation: &str) -> Vec<(String, u64)> {
    body["aggregations"][aggregation]["buckets"]
        .as_array()
        .map(|buckets| {
            buckets
                .iter()
                .filter_map(|bucket| {
                    let key = bucket["key"].as_str()?.to_string();
                    let count = bucket["doc_count"].as_u64().unwrap_or(0);
                    Some((key, count))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Extract map points from search hits, dropping documents without
/// coordinates.
fn parse_map_points(body: &Value) -> Vec<MapPoint> {
    let hits = match body["hits"]["hits"].as_array() {
        Some(hits) => hits,
        None => return Vec::new(),
    };

    hits.iter()
        .filter_map(|hit| {
            let record: TweetRecord = serde_json::from_value(hit["_source"].clone()).ok()?;
            let geo = record.geo?;
            Some(MapPoint {
                id: record.document_id(),
                geo,
                text: record.text,
                sentiment: record.sentiment.map(|s| s.label),
                hashtags: record.hashtags.unwrap_or_default(),
            })
        })
        .collect()
}

#[async_trait]
impl TweetIndexProvider for OpenSearchProvider {
    /// Drop and recreate the tweet index.
    ///
    /// A failed delete is logged and the create still runs, so a half-broken
    /// index does not leave the pipeline without a target. Only a failed
    /// create is an error.
    async fn reset_index(&self) -> Result<(), SearchIndexError> {
        let index = self.index_config.name.as_str();

        let exists_response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if exists_response.status_code().is_success() {
            info!(index = %index, "Deleting existing index");
            match self
                .client
                .indices()
                .delete(IndicesDeleteParts::Index(&[index]))
                .send()
                .await
            {
                Ok(response) if response.status_code().is_success() => {}
                Ok(response) => {
                    let status = response.status_code();
                    let error_body = response.text().await.unwrap_or_default();
                    warn!(
                        index = %index,
                        status = %status,
                        body = %error_body,
                        "Failed to delete index, continuing with create"
                    );
                }
                Err(e) => {
                    warn!(
                        index = %index,
                        error = %e,
                        "Failed to delete index, continuing with create"
                    );
                }
            }
        } else {
            info!(index = %index, "Index does not exist, creating new one");
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(get_index_settings())
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index, status = %status, body = %error_body, "Index creation failed");
            return Err(SearchIndexError::index_creation(format!(
                "Create failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %index, "Created index with mappings");
        Ok(())
    }

    /// Write a record, keyed by its record id so rewrites replace.
    async fn index_document(&self, record: &TweetRecord) -> Result<(), SearchIndexError> {
        let doc_id = record.document_id();

        let response = self
            .client
            .index(IndexParts::IndexId(&self.index_config.name, &doc_id))
            .body(record)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(doc_id = %doc_id, status = %status, body = %error_body, "Index request failed");
            return Err(SearchIndexError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %doc_id, "Document indexed");
        Ok(())
    }
}

#[async_trait]
impl TweetSearchClient for OpenSearchProvider {
    /// Search tweets with optional filters, newest first.
    async fn search_tweets(&self, query: &TweetQuery) -> Result<TweetPage, SearchIndexError> {
        let body = self.search(queries::build_search_body(query)).await?;

        Ok(TweetPage {
            total: parse_total(&body),
            tweets: parse_search_hits(&body),
        })
    }

    /// Fetch a single tweet by id; a missing document maps to
    /// `DocumentNotFound`.
    async fn get_tweet(&self, id: &str) -> Result<TweetRecord, SearchIndexError> {
        let response = self
            .client
            .get(GetParts::IndexId(&self.index_config.name, id))
            .send()
            .await
            .map_err(|e| SearchIndexError::search(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Err(SearchIndexError::document_not_found(id));
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(doc_id = %id, status = %status, body = %error_body, "Get request failed");
            return Err(SearchIndexError::search(format!(
                "Get failed with status {}: {}",
                status, error_body
            )));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        serde_json::from_value(body["_source"].clone())
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }

    /// Aggregate the most frequent hashtags.
    async fn trending_hashtags(
        &self,
        query: &TrendsQuery,
    ) -> Result<TrendsSummary, SearchIndexError> {
        let body = self.search(queries::build_trends_body(query)).await?;

        let hashtags = parse_term_buckets(&body, "hashtags")
            .into_iter()
            .map(|(tag, count)| TrendingHashtag { tag, count })
            .collect();

        Ok(TrendsSummary {
            hashtags,
            total_analyzed: parse_total(&body),
        })
    }

    /// Aggregate tweet counts per region.
    async fn region_counts(&self) -> Result<RegionsSummary, SearchIndexError> {
        let body = self.search(queries::build_regions_body()).await?;

        let regions = parse_term_buckets(&body, "regions")
            .into_iter()
            .map(|(region, count)| RegionCount { region, count })
            .collect();

        Ok(RegionsSummary {
            regions,
            total_analyzed: parse_total(&body),
        })
    }

    /// Aggregate the sentiment label distribution.
    async fn sentiment_summary(&self) -> Result<SentimentSummary, SearchIndexError> {
        let body = self.search(queries::build_sentiment_body()).await?;

        let mut summary = SentimentSummary {
            positive: 0,
            negative: 0,
            neutral: 0,
            total_analyzed: parse_total(&body),
        };

        for (label, count) in parse_term_buckets(&body, "sentiments") {
            match label.as_str() {
                "positive" => summary.positive = count,
                "negative" => summary.negative = count,
                "neutral" => summary.neutral = count,
                other => warn!(label = %other, "Unexpected sentiment label in aggregation"),
            }
        }

        Ok(summary)
    }

    /// Fetch geo-tagged tweets for the map overlay.
    async fn map_points(&self, query: &MapQuery) -> Result<MapData, SearchIndexError> {
        let body = self.search(queries::build_map_body(query)).await?;

        Ok(MapData {
            total: parse_total(&body),
            points: parse_map_points(&body),
        })
    }
}
