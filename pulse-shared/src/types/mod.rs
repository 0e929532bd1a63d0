//! This module defines the core data structures and types used across the pipeline.
//! It re-exports the record, enrichment, and query types.

pub mod enrichment;
pub mod query;
pub mod record;

pub use enrichment::{GeoPoint, Region, Sentiment, SentimentLabel};
pub use record::{RecordId, TweetRecord, TweetUser};
