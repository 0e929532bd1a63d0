//! # Pulse Repository
//!
//! This crate provides traits and implementations for interacting with the
//! tweet search index. It includes definitions for errors, interfaces, and a
//! concrete implementation for OpenSearch.

pub mod errors;
pub mod interfaces;
pub mod opensearch;

pub use errors::SearchIndexError;
pub use interfaces::{TweetIndexProvider, TweetSearchClient};
pub use opensearch::{IndexConfig, OpenSearchProvider};
