//! Sentiment scoring stage.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use pulse_shared::{Sentiment, TweetRecord};

use crate::enrich::EnrichStage;
use crate::errors::StageError;

/// Positive keywords for the built-in analyzer.
const POSITIVE_WORDS: [&str; 7] = [
    "good",
    "great",
    "awesome",
    "excellent",
    "happy",
    "love",
    "amazing",
];

/// Negative keywords for the built-in analyzer.
const NEGATIVE_WORDS: [&str; 7] = [
    "bad",
    "terrible",
    "awful",
    "sad",
    "hate",
    "disappointing",
    "poor",
];

/// Raw polarity and subjectivity produced by an analyzer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Scores free text for sentiment.
pub trait SentimentAnalyzer: Send + Sync {
    /// Name of the analyzer, used in logs.
    fn name(&self) -> &'static str;

    /// Score a non-empty text.
    fn score(&self, text: &str) -> Result<SentimentScore, StageError>;
}

fn count_matches(text: &str, words: &[&str]) -> usize {
    words.iter().filter(|word| text.contains(**word)).count()
}

/// Keyword-counting analyzer.
///
/// Counts positive and negative keyword occurrences by substring containment
/// over the lowercased text. Polarity is the normalized difference of the
/// counts; subjectivity grows with the number of sentiment words, capped at
/// 1.0. Text with no sentiment words scores as fully neutral with middling
/// subjectivity.
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for KeywordAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer for KeywordAnalyzer {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn score(&self, text: &str) -> Result<SentimentScore, StageError> {
        let lowered = text.to_lowercase();

        let positive = count_matches(&lowered, &POSITIVE_WORDS);
        let negative = count_matches(&lowered, &NEGATIVE_WORDS);
        let total = positive + negative;

        if total == 0 {
            return Ok(SentimentScore {
                polarity: 0.0,
                subjectivity: 0.5,
            });
        }

        Ok(SentimentScore {
            polarity: (positive as f64 - negative as f64) / total as f64,
            subjectivity: (total as f64 / 10.0).min(1.0),
        })
    }
}

/// Analyzer backed by a word-score lexicon file.
///
/// Each line holds `word polarity subjectivity`, whitespace-separated. Blank
/// lines and lines starting with `#` are ignored. Scores of matched words are
/// averaged; text matching no lexicon words scores the same as the keyword
/// analyzer's no-match case.
pub struct LexiconAnalyzer {
    entries: HashMap<String, (f64, f64)>,
}

impl LexiconAnalyzer {
    /// Load a lexicon from a file.
    pub fn from_file(path: &Path) -> Result<Self, StageError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            StageError::failed(format!("Failed to read lexicon {}: {}", path.display(), e))
        })?;
        Self::parse(&contents)
    }

    /// Parse lexicon file contents.
    pub fn parse(contents: &str) -> Result<Self, StageError> {
        let mut entries = HashMap::new();

        for (number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let word = parts.next();
            let polarity = parts.next().and_then(|p| p.parse::<f64>().ok());
            let subjectivity = parts.next().and_then(|s| s.parse::<f64>().ok());

            match (word, polarity, subjectivity) {
                (Some(word), Some(polarity), Some(subjectivity)) => {
                    entries.insert(
                        word.to_lowercase(),
                        (polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0)),
                    );
                }
                _ => {
                    return Err(StageError::failed(format!(
                        "Invalid lexicon entry on line {}",
                        number + 1
                    )));
                }
            }
        }

        if entries.is_empty() {
            return Err(StageError::failed("Lexicon contains no entries"));
        }

        Ok(Self { entries })
    }

    /// Number of words in the lexicon.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SentimentAnalyzer for LexiconAnalyzer {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn score(&self, text: &str) -> Result<SentimentScore, StageError> {
        let lowered = text.to_lowercase();

        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut matched = 0usize;

        for (word, (polarity, subjectivity)) in &self.entries {
            if lowered.contains(word.as_str()) {
                polarity_sum += polarity;
                subjectivity_sum += subjectivity;
                matched += 1;
            }
        }

        if matched == 0 {
            return Ok(SentimentScore {
                polarity: 0.0,
                subjectivity: 0.5,
            });
        }

        Ok(SentimentScore {
            polarity: polarity_sum / matched as f64,
            subjectivity: subjectivity_sum / matched as f64,
        })
    }
}

/// Scores the record text and attaches the sentiment family.
///
/// Records with no text get a fully neutral sentiment without consulting the
/// analyzer.
pub struct SentimentStage {
    analyzer: Box<dyn SentimentAnalyzer>,
}

impl SentimentStage {
    pub fn new(analyzer: Box<dyn SentimentAnalyzer>) -> Self {
        Self { analyzer }
    }
}

impl EnrichStage for SentimentStage {
    fn name(&self) -> &'static str {
        "sentiment"
    }

    fn apply(&self, mut record: TweetRecord) -> Result<TweetRecord, StageError> {
        let text = record.text.as_deref().unwrap_or("");

        if text.is_empty() {
            record.sentiment = Some(Sentiment::neutral());
            return Ok(record);
        }

        let score = self.analyzer.score(text)?;
        record.sentiment = Some(Sentiment::from_scores(score.polarity, score.subjectivity));

        Ok(record)
    }

    fn on_failure(&self, mut record: TweetRecord) -> TweetRecord {
        record.sentiment = Some(Sentiment::neutral());
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_shared::{RecordId, SentimentLabel};

    fn keyword_stage() -> SentimentStage {
        SentimentStage::new(Box::new(KeywordAnalyzer::new()))
    }

    #[test]
    fn test_positive_text_scoring() {
        let record = TweetRecord::with_text(RecordId::Int(1), "I love this, it is great");
        let enriched = keyword_stage().apply(record).unwrap();

        let sentiment = enriched.sentiment.unwrap();
        assert_eq!(sentiment.polarity, 1.0);
        assert_eq!(sentiment.subjectivity, 0.2);
        assert_eq!(sentiment.label, SentimentLabel::Positive);
    }

    #[test]
    fn test_negative_text_scoring() {
        let record = TweetRecord::with_text(RecordId::Int(2), "terrible service, really bad");
        let enriched = keyword_stage().apply(record).unwrap();

        let sentiment = enriched.sentiment.unwrap();
        assert_eq!(sentiment.polarity, -1.0);
        assert_eq!(sentiment.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_mixed_text_is_neutral() {
        let record = TweetRecord::with_text(RecordId::Int(3), "good parts, bad parts");
        let enriched = keyword_stage().apply(record).unwrap();

        let sentiment = enriched.sentiment.unwrap();
        assert_eq!(sentiment.polarity, 0.0);
        assert_eq!(sentiment.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_no_sentiment_words() {
        let record = TweetRecord::with_text(RecordId::Int(4), "the meeting is at noon");
        let enriched = keyword_stage().apply(record).unwrap();

        let sentiment = enriched.sentiment.unwrap();
        assert_eq!(sentiment.polarity, 0.0);
        assert_eq!(sentiment.subjectivity, 0.5);
        assert_eq!(sentiment.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_empty_text_is_fully_neutral() {
        for record in [
            TweetRecord::new(RecordId::Int(5)),
            TweetRecord::with_text(RecordId::Int(5), ""),
        ] {
            let enriched = keyword_stage().apply(record).unwrap();

            let sentiment = enriched.sentiment.unwrap();
            assert_eq!(sentiment.polarity, 0.0);
            assert_eq!(sentiment.subjectivity, 0.0);
            assert_eq!(sentiment.label, SentimentLabel::Neutral);
        }
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let record = TweetRecord::with_text(RecordId::Int(6), "AMAZING work");
        let enriched = keyword_stage().apply(record).unwrap();

        assert_eq!(enriched.sentiment.unwrap().label, SentimentLabel::Positive);
    }

    #[test]
    fn test_subjectivity_caps_at_one() {
        let analyzer = KeywordAnalyzer::new();
        let text = "good great awesome excellent happy love amazing \
                    bad terrible awful sad hate disappointing poor";
        let score = analyzer.score(text).unwrap();

        assert_eq!(score.subjectivity, 1.0);
    }

    #[test]
    fn test_on_failure_yields_neutral() {
        let record = TweetRecord::with_text(RecordId::Int(7), "whatever");
        let fallback = keyword_stage().on_failure(record);

        let sentiment = fallback.sentiment.unwrap();
        assert_eq!(sentiment.polarity, 0.0);
        assert_eq!(sentiment.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_lexicon_parse_and_score() {
        let lexicon = LexiconAnalyzer::parse(
            "# polarity and subjectivity per word\n\
             stellar 1.0 0.9\n\
             dreadful -0.8 0.7\n\
             \n\
             fine 0.2 0.3\n",
        )
        .unwrap();

        assert_eq!(lexicon.len(), 3);

        let score = lexicon.score("a stellar result").unwrap();
        assert_eq!(score.polarity, 1.0);
        assert_eq!(score.subjectivity, 0.9);

        let score = lexicon.score("stellar but dreadful").unwrap();
        assert!((score.polarity - 0.1).abs() < 1e-9);
        assert!((score.subjectivity - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_lexicon_clamps_out_of_range_scores() {
        let lexicon = LexiconAnalyzer::parse("wild 5.0 3.0\n").unwrap();
        let score = lexicon.score("wild ride").unwrap();

        assert_eq!(score.polarity, 1.0);
        assert_eq!(score.subjectivity, 1.0);
    }

    #[test]
    fn test_lexicon_rejects_malformed_lines() {
        assert!(LexiconAnalyzer::parse("word-without-scores\n").is_err());
        assert!(LexiconAnalyzer::parse("word one two\n").is_err());
        assert!(LexiconAnalyzer::parse("").is_err());
        assert!(LexiconAnalyzer::parse("# only comments\n").is_err());
    }

    #[test]
    fn test_lexicon_no_match_is_neutral() {
        let lexicon = LexiconAnalyzer::parse("stellar 1.0 0.9\n").unwrap();
        let score = lexicon.score("nothing notable").unwrap();

        assert_eq!(score.polarity, 0.0);
        assert_eq!(score.subjectivity, 0.5);
    }
}
