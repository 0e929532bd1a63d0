//! The source poller.
//!
//! Polls the source store on a fixed interval, filters records by a
//! monotonic high-water mark, and publishes new ones to the raw topic.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use pulse_shared::RecordId;

use crate::publisher::RecordPublisher;
use crate::source::SourceStore;

/// Numeric id of a snapshot record, if it has a usable one.
fn parse_record_id(record: &Value) -> Option<i64> {
    serde_json::from_value::<RecordId>(record.get("id")?.clone())
        .ok()?
        .as_i64()
}

/// Polls the source store and feeds the raw topic.
///
/// `last_id` is the high-water mark: the largest record id whose publish the
/// broker has acknowledged. It only advances on confirmed publishes, so a
/// failed publish leaves its record (and everything after it) eligible again
/// on the next tick. Records may therefore be published more than once, but
/// never silently dropped.
pub struct Collector {
    source: Arc<dyn SourceStore>,
    publisher: Arc<dyn RecordPublisher>,
    last_id: i64,
}

impl Collector {
    /// Create a collector with its high-water mark at zero, so the first
    /// tick offers the entire snapshot.
    pub fn new(source: Arc<dyn SourceStore>, publisher: Arc<dyn RecordPublisher>) -> Self {
        Self {
            source,
            publisher,
            last_id: 0,
        }
    }

    /// The current high-water mark.
    pub fn last_id(&self) -> i64 {
        self.last_id
    }

    /// Run one poll tick: fetch the snapshot and publish unseen records in
    /// snapshot order.
    ///
    /// A fetch failure skips the whole tick. A record with a missing or
    /// unparseable id is skipped with a warning. A publish failure ends the
    /// tick without advancing the mark past the failed record.
    ///
    /// Returns the number of records published.
    pub async fn poll_once(&mut self) -> usize {
        let records = match self.source.fetch_snapshot().await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "Failed to fetch snapshot, skipping tick");
                return 0;
            }
        };

        let mut published = 0;

        for record in &records {
            let id = match parse_record_id(record) {
                Some(id) => id,
                None => {
                    warn!("Skipping record with missing or unparseable id");
                    continue;
                }
            };

            if id <= self.last_id {
                continue;
            }

            match self.publisher.publish(record).await {
                Ok(()) => {
                    self.last_id = id;
                    published += 1;
                }
                Err(e) => {
                    // The mark must not move past an unacknowledged record,
                    // so the rest of the snapshot waits for the next tick.
                    warn!(id = id, error = %e, "Publish failed, will retry next tick");
                    break;
                }
            }
        }

        info!(
            published = published,
            last_id = self.last_id,
            "Poll tick complete"
        );
        published
    }

    /// Poll on a fixed interval until interrupted.
    ///
    /// The first tick fires immediately; later ticks that fall behind are
    /// skipped rather than bunched.
    pub async fn run(&mut self, poll_interval: Duration) {
        info!(
            interval_secs = poll_interval.as_secs(),
            "Starting collector loop"
        );

        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Collector received shutdown signal");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use crate::errors::CollectorError;

    struct MockSource {
        records: Mutex<Vec<Value>>,
    }

    impl MockSource {
        fn new(records: Vec<Value>) -> Arc<Self> {
            Arc::new(Self {
                records: Mutex::new(records),
            })
        }
    }

    #[async_trait]
    impl SourceStore for MockSource {
        async fn fetch_snapshot(&self) -> Result<Vec<Value>, CollectorError> {
            Ok(self.records.lock().unwrap().clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl SourceStore for FailingSource {
        async fn fetch_snapshot(&self) -> Result<Vec<Value>, CollectorError> {
            Err(CollectorError::source("connection refused"))
        }
    }

    struct MockPublisher {
        published: Mutex<Vec<Value>>,
        failing_ids: Mutex<HashSet<i64>>,
    }

    impl MockPublisher {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                published: Mutex::new(Vec::new()),
                failing_ids: Mutex::new(HashSet::new()),
            })
        }

        fn fail_id(&self, id: i64) {
            self.failing_ids.lock().unwrap().insert(id);
        }

        fn heal_id(&self, id: i64) {
            self.failing_ids.lock().unwrap().remove(&id);
        }

        fn published_ids(&self) -> Vec<i64> {
            self.published
                .lock()
                .unwrap()
                .iter()
                .filter_map(parse_record_id)
                .collect()
        }
    }

    #[async_trait]
    impl RecordPublisher for MockPublisher {
        async fn publish(&self, record: &Value) -> Result<(), CollectorError> {
            let id = parse_record_id(record).unwrap_or_default();
            if self.failing_ids.lock().unwrap().contains(&id) {
                return Err(CollectorError::publish("delivery failed"));
            }
            self.published.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    #[test]
    fn test_parse_record_id() {
        assert_eq!(parse_record_id(&json!({"id": 1050})), Some(1050));
        assert_eq!(parse_record_id(&json!({"id": "1050"})), Some(1050));
        assert_eq!(parse_record_id(&json!({"id": "abc"})), None);
        assert_eq!(parse_record_id(&json!({"text": "no id"})), None);
    }

    #[tokio::test]
    async fn test_publishes_new_records_in_snapshot_order() {
        let source = MockSource::new(vec![
            json!({"id": 1, "text": "first"}),
            json!({"id": 2, "text": "second"}),
            json!({"id": 3, "text": "third"}),
        ]);
        let publisher = MockPublisher::new();
        let mut collector = Collector::new(source, publisher.clone());

        let published = collector.poll_once().await;

        assert_eq!(published, 3);
        assert_eq!(collector.last_id(), 3);
        assert_eq!(publisher.published_ids(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_seen_records_are_not_republished() {
        let source = MockSource::new(vec![json!({"id": 1}), json!({"id": 2})]);
        let publisher = MockPublisher::new();
        let mut collector = Collector::new(source, publisher.clone());

        assert_eq!(collector.poll_once().await, 2);
        assert_eq!(collector.poll_once().await, 0);
        assert_eq!(publisher.published_ids(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_failed_publish_holds_high_water_mark() {
        let source = MockSource::new(vec![json!({"id": 1050}), json!({"id": 1051})]);
        let publisher = MockPublisher::new();
        publisher.fail_id(1051);
        let mut collector = Collector::new(source, publisher.clone());

        assert_eq!(collector.poll_once().await, 1);
        assert_eq!(collector.last_id(), 1050);
        assert_eq!(publisher.published_ids(), vec![1050]);

        // Once the broker recovers, the next tick picks the record back up.
        publisher.heal_id(1051);
        assert_eq!(collector.poll_once().await, 1);
        assert_eq!(collector.last_id(), 1051);
        assert_eq!(publisher.published_ids(), vec![1050, 1051]);
    }

    #[tokio::test]
    async fn test_failed_publish_ends_the_tick() {
        let source = MockSource::new(vec![
            json!({"id": 10}),
            json!({"id": 11}),
            json!({"id": 12}),
        ]);
        let publisher = MockPublisher::new();
        publisher.fail_id(11);
        let mut collector = Collector::new(source, publisher.clone());

        assert_eq!(collector.poll_once().await, 1);
        // Record 12 is not offered ahead of the failed record 11.
        assert_eq!(collector.last_id(), 10);
        assert_eq!(publisher.published_ids(), vec![10]);

        publisher.heal_id(11);
        assert_eq!(collector.poll_once().await, 2);
        assert_eq!(collector.last_id(), 12);
        assert_eq!(publisher.published_ids(), vec![10, 11, 12]);
    }

    #[tokio::test]
    async fn test_source_error_skips_tick() {
        let publisher = MockPublisher::new();
        let mut collector = Collector::new(Arc::new(FailingSource), publisher.clone());

        assert_eq!(collector.poll_once().await, 0);
        assert_eq!(collector.last_id(), 0);
        assert!(publisher.published_ids().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_ids_are_skipped() {
        let source = MockSource::new(vec![
            json!({"id": "abc", "text": "bad id"}),
            json!({"text": "no id"}),
            json!({"id": 7, "text": "good"}),
        ]);
        let publisher = MockPublisher::new();
        let mut collector = Collector::new(source, publisher.clone());

        assert_eq!(collector.poll_once().await, 1);
        assert_eq!(collector.last_id(), 7);
        assert_eq!(publisher.published_ids(), vec![7]);
    }

    #[tokio::test]
    async fn test_string_ids_count_against_the_mark() {
        let source = MockSource::new(vec![json!({"id": "1050"}), json!({"id": 900})]);
        let publisher = MockPublisher::new();
        let mut collector = Collector::new(source, publisher.clone());

        assert_eq!(collector.poll_once().await, 1);
        // 900 arrives after "1050" in the snapshot but is below the mark.
        assert_eq!(collector.last_id(), 1050);
        assert_eq!(publisher.published_ids(), vec![1050]);
    }
}
