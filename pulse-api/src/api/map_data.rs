//! Geo data endpoint for the map overlay.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use pulse_shared::{MapData, MapQuery};

use crate::api::parse_sentiment;
use crate::errors::ApiError;
use crate::AppState;

/// Query parameters for map data
#[derive(Debug, Deserialize)]
pub struct MapDataParams {
    /// Filter by sentiment label
    pub sentiment: Option<String>,

    /// Filter by hashtag
    pub hashtag: Option<String>,

    /// Maximum number of points to return (1-10000)
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    1000
}

/// GET /map-data?sentiment=&hashtag=&limit=
///
/// Geo-tagged tweets for map visualization. Only documents with a `geo`
/// field qualify.
pub async fn get_map_data(
    State(state): State<AppState>,
    Query(params): Query<MapDataParams>,
) -> Result<Json<MapData>, ApiError> {
    if params.limit < 1 || params.limit > 10_000 {
        return Err(ApiError::invalid_parameter(
            "limit must be between 1 and 10000",
        ));
    }

    let mut query = MapQuery::new().with_limit(params.limit);
    if let Some(sentiment) = &params.sentiment {
        query = query.with_sentiment(parse_sentiment(sentiment)?);
    }
    if let Some(hashtag) = params.hashtag {
        // Hashtags are indexed lowercased
        query = query.with_hashtag(hashtag.to_lowercase());
    }

    let data = state.search.map_points(&query).await?;
    Ok(Json(data))
}
