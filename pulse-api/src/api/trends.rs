//! Trending hashtag aggregation endpoint.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use pulse_shared::TrendsQuery;

use crate::api::parse_sentiment;
use crate::errors::ApiError;
use crate::AppState;

/// Query parameters for trending hashtags
#[derive(Debug, Deserialize)]
pub struct TrendsParams {
    /// Number of top hashtags to return (1-50)
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Restrict the aggregation to tweets matching this text
    pub q: Option<String>,

    /// Restrict the aggregation to tweets with this sentiment
    pub sentiment: Option<String>,
}

fn default_limit() -> usize {
    10
}

/// GET /trends?limit=&q=&sentiment=
///
/// Top hashtags by document count, cached per query.
pub async fn get_trends(
    State(state): State<AppState>,
    Query(params): Query<TrendsParams>,
) -> Result<Json<Value>, ApiError> {
    if params.limit < 1 || params.limit > 50 {
        return Err(ApiError::invalid_parameter(
            "limit must be between 1 and 50",
        ));
    }

    let mut query = TrendsQuery::new().with_limit(params.limit);
    if let Some(q) = &params.q {
        query = query.with_text(q.clone());
    }
    if let Some(sentiment) = &params.sentiment {
        query = query.with_sentiment(parse_sentiment(sentiment)?);
    }

    let key = format!("trends:{:?}", query);
    if let Some(cached) = state.cache.get(&key) {
        return Ok(Json(cached));
    }

    let summary = state.search.trending_hashtags(&query).await?;
    let value = serde_json::to_value(&summary).map_err(|e| ApiError::search(e.to_string()))?;
    state.cache.put(key, value.clone());

    Ok(Json(value))
}
