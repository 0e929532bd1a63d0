//! Dependency initialization and wiring for the processor.

use std::sync::Arc;

use tracing::{info, warn};

use pulse_kafka::ConsumerConfig;
use pulse_repository::{IndexConfig, OpenSearchProvider};

use crate::config::ProcessorConfig;
use crate::consumer::KafkaRecordConsumer;
use crate::enrich::{EnrichmentPipeline, KeywordAnalyzer, LexiconAnalyzer, SentimentAnalyzer};
use crate::loader::IndexLoader;
use crate::orchestrator::PipelineRunner;
use crate::publisher::KafkaProcessedPublisher;
use crate::PipelineError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured runner ready to run.
    pub runner: PipelineRunner,
}

impl Dependencies {
    /// Initialize all dependencies for one pipeline cycle.
    ///
    /// Failing to create the Kafka consumer or producer is fatal. The search
    /// index connection is not probed here: index writes are fire-and-forget
    /// and surface their own failures.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(PipelineError)` - If broker clients cannot be created
    pub async fn new(config: &ProcessorConfig) -> Result<Self, PipelineError> {
        info!(
            kafka_broker = %config.kafka_broker,
            raw_topic = %config.raw_topic,
            processed_topic = %config.processed_topic,
            opensearch_url = %config.opensearch_url,
            index_name = %config.index_name,
            "Initializing dependencies"
        );

        // Search index provider; only a malformed URL fails here.
        let index_config = IndexConfig::new(&config.index_name);
        let provider = OpenSearchProvider::new(&config.opensearch_url, index_config)
            .await
            .map_err(|e| {
                PipelineError::config(format!("Failed to create OpenSearch provider: {}", e))
            })?;

        info!("OpenSearch provider created");

        // Kafka consumer for the raw topic
        let consumer_config = ConsumerConfig::from_env(&config.kafka_broker, &config.group_id);
        let consumer =
            KafkaRecordConsumer::new(&consumer_config, &config.raw_topic).map_err(|e| {
                PipelineError::config(format!("Failed to create Kafka consumer: {}", e))
            })?;

        info!("Kafka consumer created");

        // Kafka producer for the processed topic
        let producer = pulse_kafka::create_producer(&config.kafka_broker, "pulse-processor")
            .map_err(|e| {
                PipelineError::config(format!("Failed to create Kafka producer: {}", e))
            })?;
        let publisher = KafkaProcessedPublisher::new(producer, &config.processed_topic);

        info!("Kafka producer created");

        // Sentiment analyzer: lexicon file when configured, keywords otherwise
        let analyzer: Box<dyn SentimentAnalyzer> = match &config.sentiment_lexicon {
            Some(path) => match LexiconAnalyzer::from_file(path) {
                Ok(lexicon) => {
                    info!(
                        path = %path.display(),
                        words = lexicon.len(),
                        "Loaded sentiment lexicon"
                    );
                    Box::new(lexicon)
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to load sentiment lexicon, using keyword analyzer"
                    );
                    Box::new(KeywordAnalyzer::new())
                }
            },
            None => Box::new(KeywordAnalyzer::new()),
        };

        let pipeline = EnrichmentPipeline::new(analyzer);
        let loader = IndexLoader::new(Arc::new(provider));

        let runner = PipelineRunner::new(Arc::new(consumer), pipeline, Box::new(publisher), loader);

        Ok(Self { runner })
    }
}
