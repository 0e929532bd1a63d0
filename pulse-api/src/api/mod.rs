//! HTTP handlers for the query API.

mod health;
mod map_data;
mod stats;
mod trends;
mod tweets;

pub use health::health_check;
pub use map_data::get_map_data;
pub use stats::{get_regions, get_sentiment};
pub use trends::get_trends;
pub use tweets::{get_tweet_by_id, get_tweets};

use pulse_shared::{Region, SentimentLabel};

use crate::errors::ApiError;

/// Parse a sentiment label query parameter.
pub(crate) fn parse_sentiment(value: &str) -> Result<SentimentLabel, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::invalid_parameter(format!("Invalid sentiment label: {}", value)))
}

/// Parse a region query parameter.
pub(crate) fn parse_region(value: &str) -> Result<Region, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::invalid_parameter(format!("Invalid region: {}", value)))
}
