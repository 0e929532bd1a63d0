//! Search index read trait definition.
//!
//! This module defines the abstract interface the read API uses to query
//! tweets and aggregations, keeping the HTTP layer independent of the
//! concrete search backend.

use async_trait::async_trait;

use pulse_shared::{
    MapData, MapQuery, RegionsSummary, SentimentSummary, TrendsQuery, TrendsSummary, TweetPage,
    TweetQuery, TweetRecord,
};

use crate::errors::SearchIndexError;

/// Abstracts the read side of the search index.
///
/// Implementations are injected into the API's application state so handlers
/// can be tested against mocks without a running search backend.
#[async_trait]
pub trait TweetSearchClient: Send + Sync {
    /// Search tweets with optional filters, newest first.
    async fn search_tweets(&self, query: &TweetQuery) -> Result<TweetPage, SearchIndexError>;

    /// Fetch a single tweet by its record id.
    ///
    /// # Returns
    ///
    /// * `Ok(TweetRecord)` - The stored document
    /// * `Err(SearchIndexError::DocumentNotFound)` - If no document has this id
    /// * `Err(SearchIndexError)` - If the lookup fails
    async fn get_tweet(&self, id: &str) -> Result<TweetRecord, SearchIndexError>;

    /// Aggregate the most frequent hashtags, optionally restricted by text
    /// match and sentiment.
    async fn trending_hashtags(&self, query: &TrendsQuery)
        -> Result<TrendsSummary, SearchIndexError>;

    /// Aggregate tweet counts per region.
    async fn region_counts(&self) -> Result<RegionsSummary, SearchIndexError>;

    /// Aggregate the sentiment label distribution across all tweets.
    async fn sentiment_summary(&self) -> Result<SentimentSummary, SearchIndexError>;

    /// Fetch geo-tagged tweets for the map overlay.
    async fn map_points(&self, query: &MapQuery) -> Result<MapData, SearchIndexError>;
}
