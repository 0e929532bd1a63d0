//! Query and aggregation types for the read API.
//!
//! These structs describe what the API accepts and returns. The repository
//! crate translates the query types into search engine requests.

use serde::{Deserialize, Serialize};

use crate::types::enrichment::{GeoPoint, Region, SentimentLabel};
use crate::types::record::TweetRecord;

/// Filtered, paginated tweet search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TweetQuery {
    /// Full-text match against the tweet body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Exact hashtag filter, matched case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtag: Option<String>,

    /// Sentiment label filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentLabel>,

    /// Region filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,

    /// Maximum number of results to return. Default is 10, maximum is 100.
    #[serde(default = "default_tweet_limit")]
    pub limit: usize,

    /// Offset for pagination. Default is 0.
    #[serde(default)]
    pub offset: usize,
}

fn default_tweet_limit() -> usize {
    10
}

impl Default for TweetQuery {
    fn default() -> Self {
        Self {
            text: None,
            hashtag: None,
            sentiment: None,
            region: None,
            limit: default_tweet_limit(),
            offset: 0,
        }
    }
}

impl TweetQuery {
    /// Create an unfiltered query with default pagination.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the full-text filter.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the hashtag filter.
    pub fn with_hashtag(mut self, hashtag: impl Into<String>) -> Self {
        self.hashtag = Some(hashtag.into());
        self
    }

    /// Set the sentiment filter.
    pub fn with_sentiment(mut self, sentiment: SentimentLabel) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    /// Set the region filter.
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Set the limit for results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(100); // Cap at 100
        self
    }

    /// Set the offset for pagination.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Returns true if no filter is set and the query matches everything.
    pub fn is_unfiltered(&self) -> bool {
        self.text.is_none()
            && self.hashtag.is_none()
            && self.sentiment.is_none()
            && self.region.is_none()
    }
}

/// A page of tweets with the total match count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TweetPage {
    /// Total number of matching documents, which may exceed the page size.
    pub total: u64,
    pub tweets: Vec<TweetRecord>,
}

impl TweetPage {
    pub fn empty() -> Self {
        Self {
            total: 0,
            tweets: Vec::new(),
        }
    }
}

/// Trending hashtag aggregation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendsQuery {
    /// Number of hashtags to return. Default is 10, maximum is 50.
    #[serde(default = "default_trends_limit")]
    pub limit: usize,

    /// Restrict the aggregation to tweets matching this text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Restrict the aggregation to tweets with this sentiment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentLabel>,
}

fn default_trends_limit() -> usize {
    10
}

impl Default for TrendsQuery {
    fn default() -> Self {
        Self {
            limit: default_trends_limit(),
            text: None,
            sentiment: None,
        }
    }
}

impl TrendsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(50); // Cap at 50
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_sentiment(mut self, sentiment: SentimentLabel) -> Self {
        self.sentiment = Some(sentiment);
        self
    }
}

/// A hashtag with its document count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingHashtag {
    pub tag: String,
    pub count: u64,
}

/// Trending hashtags response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendsSummary {
    pub hashtags: Vec<TrendingHashtag>,
    /// Number of tweets the aggregation ran over.
    pub total_analyzed: u64,
}

/// A region with its document count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionCount {
    pub region: String,
    pub count: u64,
}

/// Per-region tweet counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionsSummary {
    pub regions: Vec<RegionCount>,
    pub total_analyzed: u64,
}

/// Overall sentiment distribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentSummary {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
    pub total_analyzed: u64,
}

/// Map overlay request. Only geo-tagged tweets qualify.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapQuery {
    /// Sentiment label filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentLabel>,

    /// Exact hashtag filter, matched case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtag: Option<String>,

    /// Maximum number of points. Default is 1000, maximum is 10000.
    #[serde(default = "default_map_limit")]
    pub limit: usize,
}

fn default_map_limit() -> usize {
    1000
}

impl Default for MapQuery {
    fn default() -> Self {
        Self {
            sentiment: None,
            hashtag: None,
            limit: default_map_limit(),
        }
    }
}

impl MapQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sentiment(mut self, sentiment: SentimentLabel) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn with_hashtag(mut self, hashtag: impl Into<String>) -> Self {
        self.hashtag = Some(hashtag.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(10_000); // Cap at 10000
        self
    }
}

/// A single geo-tagged tweet for the map overlay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapPoint {
    pub id: String,
    pub geo: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentLabel>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// Map overlay response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapData {
    pub total: u64,
    pub points: Vec<MapPoint>,
}
