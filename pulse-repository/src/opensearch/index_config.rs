//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the tweet index.

use serde_json::{json, Value};

/// The default name of the tweet index.
pub const DEFAULT_INDEX_NAME: &str = "tweets";

/// Configuration for the tweet index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// The index name (used for all operations).
    pub name: String,
}

impl IndexConfig {
    /// Create a new index configuration.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_NAME)
    }
}

/// Get the index settings and mappings for the tweet index.
///
/// The configuration includes:
/// - **geo_point**: Normalized coordinates, enabling geo queries and the map
///   overlay's exists-filter
/// - **date fields**: `created_at` (source timestamp) and `processed_at`
///   (pipeline stamp), supporting newest-first sorting
/// - **Keyword fields**: `hashtags`, `region`, and `sentiment.label` for
///   exact-match filtering and terms aggregations
///
/// Everything else on a record (text, user block, engagement counters, fields
/// the source adds later) is mapped dynamically.
///
/// # Sharding Configuration
///
/// - 1 primary shard
/// - 0 replicas, since the pipeline targets a single-node deployment
pub fn get_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 0
        },
        "mappings": {
            "properties": {
                "id": {
                    "type": "keyword"
                },
                "text": {
                    "type": "text"
                },
                "geo": {
                    "type": "geo_point"
                },
                "created_at": {
                    "type": "date"
                },
                "processed_at": {
                    "type": "date"
                },
                "sentiment": {
                    "properties": {
                        "label": {
                            "type": "keyword"
                        },
                        "polarity": {
                            "type": "float"
                        },
                        "subjectivity": {
                            "type": "float"
                        }
                    }
                },
                "hashtags": {
                    "type": "keyword"
                },
                "region": {
                    "type": "keyword"
                }
            }
        }
    })
}
