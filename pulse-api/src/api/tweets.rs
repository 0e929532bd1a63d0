//! Tweet listing and lookup endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use pulse_shared::{TweetPage, TweetQuery, TweetRecord};

use crate::api::{parse_region, parse_sentiment};
use crate::errors::ApiError;
use crate::AppState;

/// Query parameters for tweet search
#[derive(Debug, Deserialize)]
pub struct TweetsParams {
    /// Search term matched against the tweet text
    pub q: Option<String>,

    /// Filter by hashtag
    pub hashtag: Option<String>,

    /// Filter by sentiment label (positive, negative, neutral)
    pub sentiment: Option<String>,

    /// Filter by geographic region
    pub region: Option<String>,

    /// Number of results to return (1-100)
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Number of results to skip
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    10
}

/// GET /tweets?q=&hashtag=&sentiment=&region=&limit=&offset=
///
/// List tweets with optional filters, newest first.
pub async fn get_tweets(
    State(state): State<AppState>,
    Query(params): Query<TweetsParams>,
) -> Result<Json<TweetPage>, ApiError> {
    if params.limit < 1 || params.limit > 100 {
        return Err(ApiError::invalid_parameter(
            "limit must be between 1 and 100",
        ));
    }

    let mut query = TweetQuery::new()
        .with_limit(params.limit)
        .with_offset(params.offset);

    if let Some(q) = params.q {
        query = query.with_text(q);
    }
    if let Some(hashtag) = params.hashtag {
        // Hashtags are indexed lowercased
        query = query.with_hashtag(hashtag.to_lowercase());
    }
    if let Some(sentiment) = &params.sentiment {
        query = query.with_sentiment(parse_sentiment(sentiment)?);
    }
    if let Some(region) = &params.region {
        query = query.with_region(parse_region(region)?);
    }

    let page = state.search.search_tweets(&query).await?;
    Ok(Json(page))
}

/// GET /tweets/{id}
///
/// Fetch a single tweet by its record id. Responds 404 when the document
/// does not exist.
pub async fn get_tweet_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TweetRecord>, ApiError> {
    let record = state.search.get_tweet(&id).await?;
    Ok(Json(record))
}
