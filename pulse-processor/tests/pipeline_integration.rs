//! Integration tests for the pipeline runner.
//!
//! These tests use the real PipelineRunner but mock dependencies
//! (RecordConsumer, ProcessedPublisher and TweetIndexProvider) to ensure
//! reliable testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;

use pulse_processor::consumer::StreamMessage;
use pulse_processor::enrich::{EnrichmentPipeline, KeywordAnalyzer};
use pulse_processor::errors::ProcessorError;
use pulse_processor::loader::IndexLoader;
use pulse_processor::orchestrator::{
    PipelineRunner, RecordConsumer, RunOutcome, RunnerConfig, RunnerState,
};
use pulse_processor::publisher::ProcessedPublisher;
use pulse_repository::{SearchIndexError, TweetIndexProvider};
use pulse_shared::{Region, SentimentLabel, TweetRecord};

// Mock Consumer for testing
struct MockConsumer {
    payloads: Vec<Option<Vec<u8>>>,
    error_on_subscribe: bool,
    stream_error: Option<String>,
    wait_for_shutdown: bool,
}

impl MockConsumer {
    fn new(payloads: Vec<Option<Vec<u8>>>) -> Self {
        Self {
            payloads,
            error_on_subscribe: false,
            stream_error: None,
            wait_for_shutdown: false,
        }
    }

    fn with_subscribe_error() -> Self {
        Self {
            payloads: Vec::new(),
            error_on_subscribe: true,
            stream_error: None,
            wait_for_shutdown: false,
        }
    }

    fn with_stream_error(payloads: Vec<Option<Vec<u8>>>, error: impl Into<String>) -> Self {
        Self {
            payloads,
            error_on_subscribe: false,
            stream_error: Some(error.into()),
            wait_for_shutdown: false,
        }
    }

    fn with_shutdown_wait(payloads: Vec<Option<Vec<u8>>>) -> Self {
        Self {
            payloads,
            error_on_subscribe: false,
            stream_error: None,
            wait_for_shutdown: true,
        }
    }
}

#[async_trait::async_trait]
impl RecordConsumer for MockConsumer {
    fn subscribe(&self) -> Result<(), ProcessorError> {
        // Mock subscription - succeeds unless error_on_subscribe is true
        if self.error_on_subscribe {
            Err(ProcessorError::KafkaError("Mock subscribe error".to_string()))
        } else {
            Ok(())
        }
    }

    async fn run(
        &self,
        sender: mpsc::Sender<StreamMessage>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ProcessorError> {
        // Deliver the staged payloads as records
        for payload in self.payloads.clone() {
            let _ = sender.send(StreamMessage::Record(payload)).await;
        }

        // Optionally simulate a broken stream
        if let Some(message) = &self.stream_error {
            let _ = sender.send(StreamMessage::Error(message.clone())).await;
        }

        // Send End message to signal completion
        let _ = sender.send(StreamMessage::End).await;

        // Stay alive until the runner broadcasts shutdown
        if self.wait_for_shutdown {
            let _ = shutdown.recv().await;
        }

        Ok(())
    }
}

// Mock Publisher for testing
struct MockPublisher {
    published: Arc<Mutex<Vec<TweetRecord>>>,
    fail_publish: bool,
}

impl MockPublisher {
    fn new() -> (Self, Arc<Mutex<Vec<TweetRecord>>>) {
        let published = Arc::new(Mutex::new(Vec::new()));
        let publisher = Self {
            published: published.clone(),
            fail_publish: false,
        };
        (publisher, published)
    }

    fn failing() -> Self {
        Self {
            published: Arc::new(Mutex::new(Vec::new())),
            fail_publish: true,
        }
    }
}

impl ProcessedPublisher for MockPublisher {
    fn publish(&self, record: &TweetRecord) -> Result<(), ProcessorError> {
        if self.fail_publish {
            return Err(ProcessorError::PublishError("Mock publish error".to_string()));
        }
        self.published.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn flush(&self) {}
}

// Mock Index Provider for testing
struct MockIndexProvider {
    stored: Mutex<Vec<TweetRecord>>,
    resets: AtomicUsize,
    fail_reset: bool,
}

impl MockIndexProvider {
    fn new() -> Self {
        Self {
            stored: Mutex::new(Vec::new()),
            resets: AtomicUsize::new(0),
            fail_reset: false,
        }
    }

    fn with_failing_reset() -> Self {
        Self {
            fail_reset: true,
            ..Self::new()
        }
    }

    fn stored_count(&self) -> usize {
        self.stored.lock().unwrap().len()
    }

    fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TweetIndexProvider for MockIndexProvider {
    async fn reset_index(&self) -> Result<(), SearchIndexError> {
        self.resets.fetch_add(1, Ordering::SeqCst);
        if self.fail_reset {
            return Err(SearchIndexError::index("Mock reset error"));
        }
        Ok(())
    }

    async fn index_document(&self, record: &TweetRecord) -> Result<(), SearchIndexError> {
        self.stored.lock().unwrap().push(record.clone());
        Ok(())
    }
}

fn tweet_payload(value: serde_json::Value) -> Option<Vec<u8>> {
    Some(serde_json::to_vec(&value).unwrap())
}

/// Helper to create a test runner with mocked dependencies
fn create_test_runner(
    consumer: MockConsumer,
) -> (
    PipelineRunner,
    Arc<Mutex<Vec<TweetRecord>>>,
    Arc<MockIndexProvider>,
) {
    let pipeline = EnrichmentPipeline::new(Box::new(KeywordAnalyzer::new()));
    let (publisher, published) = MockPublisher::new();
    let mock_provider = Arc::new(MockIndexProvider::new());
    let loader = IndexLoader::new(mock_provider.clone());

    let runner = PipelineRunner::new(
        Arc::new(consumer),
        pipeline,
        Box::new(publisher),
        loader,
    );

    (runner, published, mock_provider)
}

#[tokio::test]
async fn test_runner_full_integration() {
    // Test the complete flow: consume, enrich, publish and index
    let payloads = vec![
        tweet_payload(serde_json::json!({
            "id": 1,
            "text": "Trying the new #rust release, it is great",
            "location": { "lat": 40.7128, "lon": -74.0060 },
        })),
        tweet_payload(serde_json::json!({
            "id": 2,
            "text": "Feeling sad about #mondays",
        })),
    ];

    let (mut runner, published, mock_provider) = create_test_runner(MockConsumer::new(payloads));

    // Run the pipeline with a timeout to avoid hanging
    let result = timeout(Duration::from_secs(5), runner.run()).await;

    assert!(result.is_ok());
    let run_result = result.unwrap();
    assert_eq!(run_result.unwrap(), RunOutcome::Completed);
    assert_eq!(runner.state(), RunnerState::Stopped);
    assert_eq!(runner.total_processed(), 2);

    // Both records were republished and indexed, in order
    let published = published.lock().unwrap();
    assert_eq!(published.len(), 2);
    assert_eq!(mock_provider.stored_count(), 2);
    assert_eq!(mock_provider.reset_count(), 1);

    let first = &published[0];
    assert_eq!(first.hashtags, Some(vec!["rust".to_string()]));
    assert_eq!(first.region, Some(Region::NorthAmerica));
    assert_eq!(first.location_normalized, Some(true));
    assert_eq!(
        first.sentiment.as_ref().unwrap().label,
        SentimentLabel::Positive
    );
    assert_eq!(first.processed, Some(true));
    assert!(first.processed_at.is_some());

    let second = &published[1];
    assert_eq!(second.hashtags, Some(vec!["mondays".to_string()]));
    assert_eq!(second.location_normalized, Some(false));
    assert_eq!(
        second.sentiment.as_ref().unwrap().label,
        SentimentLabel::Negative
    );
}

#[tokio::test]
async fn test_malformed_records_are_skipped() {
    let payloads = vec![
        Some(b"not json at all".to_vec()),
        tweet_payload(serde_json::json!({ "id": 3, "text": "still #here" })),
    ];

    let (mut runner, published, _mock_provider) = create_test_runner(MockConsumer::new(payloads));

    let result = timeout(Duration::from_secs(5), runner.run()).await;
    assert!(result.is_ok());
    assert_eq!(result.unwrap().unwrap(), RunOutcome::Completed);

    // Only the parseable record made it through
    assert_eq!(published.lock().unwrap().len(), 1);
    assert_eq!(runner.total_processed(), 1);
}

#[tokio::test]
async fn test_empty_payloads_are_skipped() {
    let payloads = vec![None, None];

    let (mut runner, published, mock_provider) = create_test_runner(MockConsumer::new(payloads));

    let result = timeout(Duration::from_secs(5), runner.run()).await;
    assert!(result.is_ok());
    assert_eq!(result.unwrap().unwrap(), RunOutcome::Completed);

    assert_eq!(published.lock().unwrap().len(), 0);
    assert_eq!(mock_provider.stored_count(), 0);
}

#[tokio::test]
async fn test_degraded_record_still_published() {
    // An unusable location must not keep the record out of the output
    let payloads = vec![tweet_payload(serde_json::json!({
        "id": 4,
        "text": "posting from somewhere",
        "location": "not an object",
    }))];

    let (mut runner, published, mock_provider) = create_test_runner(MockConsumer::new(payloads));

    let result = timeout(Duration::from_secs(5), runner.run()).await;
    assert!(result.is_ok());
    assert_eq!(result.unwrap().unwrap(), RunOutcome::Completed);

    let published = published.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(mock_provider.stored_count(), 1);

    let record = &published[0];
    assert_eq!(record.location_normalized, Some(false));
    assert!(record.geo.is_none());
    assert!(record.region.is_none());
    assert!(record.sentiment.is_some());
    assert_eq!(record.processed, Some(true));
}

#[tokio::test]
async fn test_index_reset_failure_does_not_stop_cycle() {
    let pipeline = EnrichmentPipeline::new(Box::new(KeywordAnalyzer::new()));
    let (publisher, published) = MockPublisher::new();
    let mock_provider = Arc::new(MockIndexProvider::with_failing_reset());
    let loader = IndexLoader::new(mock_provider.clone());

    let payloads = vec![tweet_payload(serde_json::json!({ "id": 5, "text": "hello" }))];
    let mut runner = PipelineRunner::new(
        Arc::new(MockConsumer::new(payloads)),
        pipeline,
        Box::new(publisher),
        loader,
    );

    let result = timeout(Duration::from_secs(5), runner.run()).await;
    assert!(result.is_ok());
    assert_eq!(result.unwrap().unwrap(), RunOutcome::Completed);

    // The reset was attempted, failed, and the record was still published
    assert_eq!(mock_provider.reset_count(), 1);
    assert_eq!(published.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stream_error_fails_run() {
    let payloads = vec![tweet_payload(serde_json::json!({ "id": 6, "text": "fine" }))];
    let consumer = MockConsumer::with_stream_error(payloads, "Mock stream error");

    let (mut runner, published, _mock_provider) = create_test_runner(consumer);

    let result = timeout(Duration::from_secs(5), runner.run()).await;
    assert!(result.is_ok());

    let run_result = result.unwrap();
    assert!(run_result.is_err());
    assert_eq!(runner.state(), RunnerState::Crashed);

    match run_result.unwrap_err() {
        ProcessorError::KafkaError(msg) => assert_eq!(msg, "Mock stream error"),
        other => panic!("Expected KafkaError, got {:?}", other),
    }

    // The record before the failure was still handled
    assert_eq!(published.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_subscribe_error_fails_run() {
    let (mut runner, _published, _mock_provider) =
        create_test_runner(MockConsumer::with_subscribe_error());

    let result = timeout(Duration::from_secs(5), runner.run()).await;
    assert!(result.is_ok());

    let run_result = result.unwrap();
    assert!(run_result.is_err());
    assert_eq!(runner.state(), RunnerState::Crashed);

    match run_result.unwrap_err() {
        ProcessorError::KafkaError(msg) => assert_eq!(msg, "Mock subscribe error"),
        other => panic!("Expected KafkaError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_publish_failure_fails_run() {
    let pipeline = EnrichmentPipeline::new(Box::new(KeywordAnalyzer::new()));
    let mock_provider = Arc::new(MockIndexProvider::new());
    let loader = IndexLoader::new(mock_provider.clone());

    let payloads = vec![tweet_payload(serde_json::json!({ "id": 7, "text": "hello" }))];
    let mut runner = PipelineRunner::new(
        Arc::new(MockConsumer::new(payloads)),
        pipeline,
        Box::new(MockPublisher::failing()),
        loader,
    );

    let result = timeout(Duration::from_secs(5), runner.run()).await;
    assert!(result.is_ok());

    let run_result = result.unwrap();
    assert!(run_result.is_err());
    assert_eq!(runner.state(), RunnerState::Crashed);

    match run_result.unwrap_err() {
        ProcessorError::PublishError(msg) => assert_eq!(msg, "Mock publish error"),
        other => panic!("Expected PublishError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_runner_configuration() {
    // Test that the runner can be created with custom configuration
    let pipeline = EnrichmentPipeline::new(Box::new(KeywordAnalyzer::new()));
    let (publisher, _published) = MockPublisher::new();
    let mock_provider = Arc::new(MockIndexProvider::new());
    let loader = IndexLoader::new(mock_provider.clone());

    let config = RunnerConfig {
        channel_buffer_size: 2000,
        heartbeat_interval: Duration::from_secs(30),
    };

    let runner = PipelineRunner::with_config(
        Arc::new(MockConsumer::new(vec![])),
        pipeline,
        Box::new(publisher),
        loader,
        config,
    );

    assert_eq!(runner.state(), RunnerState::Starting);
}

#[tokio::test]
async fn test_runner_shutdown() {
    use tokio::sync::Mutex;

    let payloads = vec![tweet_payload(serde_json::json!({ "id": 8, "text": "bye" }))];
    let (runner, published, _mock_provider) =
        create_test_runner(MockConsumer::with_shutdown_wait(payloads));
    let runner = Arc::new(Mutex::new(runner));

    // Clone for the shutdown task
    let runner_clone = Arc::clone(&runner);

    // Create a task that will shutdown the runner after a short delay
    let shutdown_handle = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let runner = runner_clone.lock().await;
        runner.shutdown();
    });

    // Spawn the runner in background
    let runner_run_clone = Arc::clone(&runner);
    let runner_handle = tokio::spawn(async move {
        let mut runner = runner_run_clone.lock().await;
        runner.run().await
    });

    // Wait for both tasks to complete
    let (shutdown_result, runner_result) = tokio::join!(shutdown_handle, runner_handle);

    assert!(shutdown_result.is_ok(), "Shutdown task should succeed");
    assert!(runner_result.is_ok(), "Runner task should succeed");

    let run_result = runner_result.unwrap();
    assert!(run_result.is_ok(), "Runner should complete successfully");
    assert_eq!(published.lock().unwrap().len(), 1);
}
