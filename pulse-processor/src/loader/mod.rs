//! Loader module for the processor.
//!
//! Writes enriched records into the search index.

use std::sync::Arc;

use tracing::{debug, error, info};

use pulse_repository::TweetIndexProvider;
use pulse_shared::TweetRecord;

/// Loads enriched records into the search index.
///
/// Index writes are fire-and-forget: a failed write is logged and the
/// pipeline moves on. The processed topic remains the durable output, and
/// replay mode rebuilds the index from the raw topic.
pub struct IndexLoader {
    provider: Arc<dyn TweetIndexProvider>,
}

impl IndexLoader {
    /// Create a new loader backed by the given index provider.
    pub fn new(provider: Arc<dyn TweetIndexProvider>) -> Self {
        Self { provider }
    }

    /// Reset the index to a fresh, empty state.
    ///
    /// Failures are logged and absorbed; the pipeline starts anyway and any
    /// persistent index problem surfaces on the individual writes.
    pub async fn reset(&self) {
        match self.provider.reset_index().await {
            Ok(()) => info!("Search index reset"),
            Err(e) => error!(error = %e, "Failed to reset search index, continuing"),
        }
    }

    /// Index one enriched record, keyed by its record id.
    pub async fn store(&self, record: &TweetRecord) {
        match self.provider.index_document(record).await {
            Ok(()) => debug!(id = %record.id, "Indexed record"),
            Err(e) => error!(id = %record.id, error = %e, "Failed to index record"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pulse_repository::SearchIndexError;
    use pulse_shared::RecordId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockIndexProvider {
        resets: AtomicUsize,
        stored: AtomicUsize,
        failing: bool,
    }

    impl MockIndexProvider {
        fn new(failing: bool) -> Self {
            Self {
                resets: AtomicUsize::new(0),
                stored: AtomicUsize::new(0),
                failing,
            }
        }
    }

    #[async_trait]
    impl TweetIndexProvider for MockIndexProvider {
        async fn reset_index(&self) -> Result<(), SearchIndexError> {
            self.resets.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                Err(SearchIndexError::index("reset refused"))
            } else {
                Ok(())
            }
        }

        async fn index_document(&self, _record: &TweetRecord) -> Result<(), SearchIndexError> {
            if self.failing {
                return Err(SearchIndexError::index("write refused"));
            }
            self.stored.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_reset_and_store() {
        let provider = Arc::new(MockIndexProvider::new(false));
        let loader = IndexLoader::new(provider.clone());

        loader.reset().await;
        loader.store(&TweetRecord::new(RecordId::Int(1))).await;
        loader.store(&TweetRecord::new(RecordId::Int(2))).await;

        assert_eq!(provider.resets.load(Ordering::SeqCst), 1);
        assert_eq!(provider.stored.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_provider_failures_are_absorbed() {
        let provider = Arc::new(MockIndexProvider::new(true));
        let loader = IndexLoader::new(provider.clone());

        // Neither call returns a Result; failures must not panic.
        loader.reset().await;
        loader.store(&TweetRecord::new(RecordId::Int(1))).await;

        assert_eq!(provider.resets.load(Ordering::SeqCst), 1);
        assert_eq!(provider.stored.load(Ordering::SeqCst), 0);
    }
}
