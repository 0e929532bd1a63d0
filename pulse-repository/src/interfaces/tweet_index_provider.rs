//! Search index write trait definition.
//!
//! This module defines the abstract interface for the index write path,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use pulse_shared::TweetRecord;

use crate::errors::SearchIndexError;

/// Abstracts the write side of the search index.
///
/// Implementations are injected into the processor's loader to enable
/// dependency injection and easy testing with mock implementations.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error
/// handling across different backend implementations.
///
/// # Index Initialization
///
/// The processor calls `reset_index` once per run before consuming records.
/// The reset is destructive: any existing index is dropped and recreated with
/// current mappings. This pairs with the consumer's replay mode, which
/// re-reads the raw topic from the beginning, so the index is rebuilt rather
/// than patched. Running two processors against the same index is therefore
/// not supported.
#[async_trait]
pub trait TweetIndexProvider: Send + Sync {
    /// Drop and recreate the search index with current mappings.
    ///
    /// A delete failure is logged and does not abort the reset; the create
    /// step still runs. An absent index is not an error.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created and is ready for writes
    /// * `Err(SearchIndexError)` - If index creation fails
    async fn reset_index(&self) -> Result<(), SearchIndexError>;

    /// Write a record into the index, keyed by its record id.
    ///
    /// Writing the same record id again replaces the existing document, so
    /// reprocessing a record never duplicates it.
    ///
    /// # Arguments
    ///
    /// * `record` - The enriched record to index
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was written successfully
    /// * `Err(SearchIndexError)` - If the write fails
    async fn index_document(&self, record: &TweetRecord) -> Result<(), SearchIndexError>;
}
