//! Interface definitions for the search index.
//!
//! This module defines the abstract `TweetIndexProvider` and
//! `TweetSearchClient` traits that allow for dependency injection and
//! swappable search backend implementations. The write side (used by the
//! processor) and the read side (used by the API) are separate traits so
//! each binary depends only on the operations it needs.

mod tweet_index_provider;
mod tweet_search_client;

pub use tweet_index_provider::TweetIndexProvider;
pub use tweet_search_client::TweetSearchClient;
