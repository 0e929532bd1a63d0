//! Enrichment stages for tweet records.
//!
//! Each stage adds one family of derived fields to a record. The pipeline
//! runs the stages in a fixed order: hashtags, then location, then
//! sentiment. Stages are degrade-safe: a failing stage is replaced by its
//! fallback output and the record continues through the remaining stages.

mod hashtag;
mod location;
mod sentiment;

pub use hashtag::HashtagStage;
pub use location::LocationStage;
pub use sentiment::{
    KeywordAnalyzer, LexiconAnalyzer, SentimentAnalyzer, SentimentScore, SentimentStage,
};

use tracing::warn;

use pulse_shared::TweetRecord;

use crate::errors::StageError;

/// A single enrichment stage.
pub trait EnrichStage: Send + Sync {
    /// Name of the stage, used in logs.
    fn name(&self) -> &'static str;

    /// Apply the stage to a record, returning the enriched record.
    fn apply(&self, record: TweetRecord) -> Result<TweetRecord, StageError>;

    /// Fallback output when `apply` fails.
    ///
    /// Receives the record as it was before the stage ran. Defaults to
    /// passing it through unchanged.
    fn on_failure(&self, record: TweetRecord) -> TweetRecord {
        record
    }
}

/// Runs the enrichment stages over a record in order.
pub struct EnrichmentPipeline {
    stages: Vec<Box<dyn EnrichStage>>,
}

impl EnrichmentPipeline {
    /// Create the standard pipeline: hashtags, location, sentiment.
    pub fn new(analyzer: Box<dyn SentimentAnalyzer>) -> Self {
        Self {
            stages: vec![
                Box::new(HashtagStage::new()),
                Box::new(LocationStage::new()),
                Box::new(SentimentStage::new(analyzer)),
            ],
        }
    }

    /// Create a pipeline from an explicit stage list.
    pub fn with_stages(stages: Vec<Box<dyn EnrichStage>>) -> Self {
        Self { stages }
    }

    /// Run every stage over the record.
    ///
    /// A failing stage is logged and its fallback output used in place of
    /// the enrichment; the record always comes out the other end.
    pub fn enrich(&self, record: TweetRecord) -> TweetRecord {
        let mut current = record;

        for stage in &self.stages {
            let fallback = current.clone();
            current = match stage.apply(current) {
                Ok(enriched) => enriched,
                Err(e) => {
                    warn!(
                        stage = stage.name(),
                        id = %fallback.id,
                        error = %e,
                        "Enrichment stage failed, using fallback output"
                    );
                    stage.on_failure(fallback)
                }
            };
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_shared::RecordId;

    struct FailingStage;

    impl EnrichStage for FailingStage {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn apply(&self, _record: TweetRecord) -> Result<TweetRecord, StageError> {
            Err(StageError::failed("boom"))
        }
    }

    #[test]
    fn test_standard_pipeline_fills_all_families() {
        let pipeline = EnrichmentPipeline::new(Box::new(KeywordAnalyzer::new()));
        let record = TweetRecord::with_text(RecordId::Int(1), "I love #Rust");

        let enriched = pipeline.enrich(record);

        assert_eq!(enriched.hashtags, Some(vec!["rust".to_string()]));
        assert_eq!(enriched.hashtag_count, Some(1));
        // No coordinates and no profile location on this record.
        assert_eq!(enriched.location_normalized, Some(false));
        assert!(enriched.sentiment.is_some());
    }

    #[test]
    fn test_failing_stage_does_not_drop_record() {
        let pipeline = EnrichmentPipeline::with_stages(vec![
            Box::new(FailingStage),
            Box::new(HashtagStage::new()),
        ]);
        let record = TweetRecord::with_text(RecordId::Int(2), "still here #ok");

        let enriched = pipeline.enrich(record);

        // The failing stage passed the record through and the next stage ran.
        assert_eq!(enriched.id, RecordId::Int(2));
        assert_eq!(enriched.hashtags, Some(vec!["ok".to_string()]));
    }

    #[test]
    fn test_failing_stage_output_is_pre_stage_record() {
        struct MutatingThenFailing;

        impl EnrichStage for MutatingThenFailing {
            fn name(&self) -> &'static str {
                "mutating"
            }

            fn apply(&self, mut record: TweetRecord) -> Result<TweetRecord, StageError> {
                record.text = Some("mutated".to_string());
                Err(StageError::failed("after mutation"))
            }
        }

        let pipeline = EnrichmentPipeline::with_stages(vec![Box::new(MutatingThenFailing)]);
        let record = TweetRecord::with_text(RecordId::Int(3), "original");

        let enriched = pipeline.enrich(record);

        // The fallback sees the record as it was before the stage ran.
        assert_eq!(enriched.text, Some("original".to_string()));
    }
}
