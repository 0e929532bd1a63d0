//! OpenSearch implementation of the search index traits.
//!
//! This module provides a concrete implementation of `TweetIndexProvider`
//! and `TweetSearchClient` using OpenSearch as the backend.

mod index_config;
mod provider;
mod queries;

pub use index_config::{get_index_settings, IndexConfig, DEFAULT_INDEX_NAME};
pub use provider::OpenSearchProvider;
