//! Region and sentiment aggregation endpoints.

use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::errors::ApiError;
use crate::AppState;

/// GET /regions
///
/// Tweet counts per geographic region, cached.
pub async fn get_regions(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if let Some(cached) = state.cache.get("regions") {
        return Ok(Json(cached));
    }

    let summary = state.search.region_counts().await?;
    let value = serde_json::to_value(&summary).map_err(|e| ApiError::search(e.to_string()))?;
    state.cache.put("regions", value.clone());

    Ok(Json(value))
}

/// GET /sentiment
///
/// Sentiment label distribution across all tweets, cached.
pub async fn get_sentiment(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if let Some(cached) = state.cache.get("sentiment") {
        return Ok(Json(cached));
    }

    let summary = state.search.sentiment_summary().await?;
    let value = serde_json::to_value(&summary).map_err(|e| ApiError::search(e.to_string()))?;
    state.cache.put("sentiment", value.clone());

    Ok(Json(value))
}
