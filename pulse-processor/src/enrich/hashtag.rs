//! Hashtag extraction stage.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use pulse_shared::TweetRecord;

use crate::enrich::EnrichStage;
use crate::errors::StageError;

lazy_static! {
    static ref HASHTAG_REGEXP: Regex = Regex::new(r"#(\w+)").unwrap();
}

/// Extracts hashtags from the record text and derives tag statistics.
///
/// Tags already present on the record are kept (lowercased) instead of
/// re-extracted, so running the stage over an enriched record produces the
/// same output.
pub struct HashtagStage;

impl HashtagStage {
    pub fn new() -> Self {
        Self
    }

    /// All hashtags in the text, lowercased, in order of appearance.
    fn extract(text: &str) -> Vec<String> {
        HASHTAG_REGEXP
            .captures_iter(text)
            .map(|capture| capture[1].to_lowercase())
            .collect()
    }
}

impl Default for HashtagStage {
    fn default() -> Self {
        Self::new()
    }
}

impl EnrichStage for HashtagStage {
    fn name(&self) -> &'static str {
        "hashtags"
    }

    fn apply(&self, mut record: TweetRecord) -> Result<TweetRecord, StageError> {
        let hashtags: Vec<String> = match record.hashtags.take() {
            Some(tags) if !tags.is_empty() => {
                tags.into_iter().map(|tag| tag.to_lowercase()).collect()
            }
            _ => {
                let text = record.text.as_deref().unwrap_or("");
                Self::extract(text)
            }
        };

        let mut frequency: HashMap<String, usize> = HashMap::new();
        for tag in &hashtags {
            *frequency.entry(tag.clone()).or_insert(0) += 1;
        }

        record.hashtag_count = Some(hashtags.len());
        record.hashtag_frequency = Some(frequency);
        record.hashtags = Some(hashtags);

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_shared::RecordId;

    fn apply(record: TweetRecord) -> TweetRecord {
        HashtagStage::new().apply(record).unwrap()
    }

    #[test]
    fn test_extracts_and_lowercases_tags() {
        let record = TweetRecord::with_text(RecordId::Int(1), "Big news on #Rust and #WebDev!");
        let enriched = apply(record);

        assert_eq!(
            enriched.hashtags,
            Some(vec!["rust".to_string(), "webdev".to_string()])
        );
        assert_eq!(enriched.hashtag_count, Some(2));
    }

    #[test]
    fn test_counts_repeated_tags() {
        let record = TweetRecord::with_text(RecordId::Int(2), "#ai again #AI and once more #ai");
        let enriched = apply(record);

        assert_eq!(enriched.hashtag_count, Some(3));
        let frequency = enriched.hashtag_frequency.unwrap();
        assert_eq!(frequency.get("ai"), Some(&3));
        assert_eq!(frequency.len(), 1);
    }

    #[test]
    fn test_no_tags_yields_empty_families() {
        let record = TweetRecord::with_text(RecordId::Int(3), "nothing tagged here");
        let enriched = apply(record);

        assert_eq!(enriched.hashtags, Some(vec![]));
        assert_eq!(enriched.hashtag_count, Some(0));
        assert_eq!(enriched.hashtag_frequency, Some(HashMap::new()));
    }

    #[test]
    fn test_missing_text_treated_as_empty() {
        let record = TweetRecord::new(RecordId::Int(4));
        let enriched = apply(record);

        assert_eq!(enriched.hashtags, Some(vec![]));
        assert_eq!(enriched.hashtag_count, Some(0));
    }

    #[test]
    fn test_existing_tags_are_kept_not_reextracted() {
        let mut record = TweetRecord::with_text(RecordId::Int(5), "#fresh text");
        record.hashtags = Some(vec!["Provided".to_string()]);
        let enriched = apply(record);

        assert_eq!(enriched.hashtags, Some(vec!["provided".to_string()]));
        assert_eq!(enriched.hashtag_count, Some(1));
    }

    #[test]
    fn test_stage_is_idempotent() {
        let record = TweetRecord::with_text(RecordId::Int(6), "ship it #Launch #launch");
        let once = apply(record);
        let twice = apply(once.clone());

        assert_eq!(once.hashtags, twice.hashtags);
        assert_eq!(once.hashtag_count, twice.hashtag_count);
        assert_eq!(once.hashtag_frequency, twice.hashtag_frequency);
    }
}
