//! # Pulse Shared
//!
//! This crate defines shared data structures and types used across the tweet pulse
//! pipeline. It includes the tweet record that flows from collection through
//! enrichment to the search index, plus the query and aggregation types served
//! by the read API.

pub mod types;

pub use types::enrichment::{GeoPoint, Region, Sentiment, SentimentLabel};
pub use types::query::{
    MapData, MapPoint, MapQuery, RegionCount, RegionsSummary, SentimentSummary, TrendingHashtag,
    TrendsQuery, TrendsSummary, TweetPage, TweetQuery,
};
pub use types::record::{RecordId, TweetRecord, TweetUser};
