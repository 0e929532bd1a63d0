//! Tweet record types for the pulse pipeline.
//!
//! This module defines the record structure that flows from the collector
//! through enrichment and into the search index. Records arrive from the
//! source with a loose shape, so every field apart from the id is optional
//! and unknown fields are carried through untouched.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::enrichment::{GeoPoint, Region, Sentiment};

/// Identifier of a tweet record.
///
/// The source emits ids either as JSON integers or as numeric strings,
/// depending on which client wrote the record. Both forms refer to the same
/// id space, so ordering comparisons go through [`RecordId::as_i64`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Numeric value of the id, if it has one.
    ///
    /// String ids are trimmed and parsed; anything non-numeric yields `None`
    /// and the caller decides whether to skip the record.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RecordId::Int(id) => Some(*id),
            RecordId::Text(id) => id.trim().parse().ok(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => write!(f, "{id}"),
        }
    }
}

/// The author block embedded in a tweet record.
///
/// `location` is a free-form profile string ("New York, USA") and is only
/// consulted as a fallback when the record carries no usable coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TweetUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Unknown user fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A tweet record at any point in its life cycle.
///
/// The same struct represents both raw records (as fetched from the source)
/// and enriched records (as republished and indexed). Enrichment fields start
/// as `None` and are filled in by the pipeline stages; absent fields are
/// omitted when the record is serialized, so a raw record round-trips without
/// picking up nulls.
///
/// # Fields
///
/// - `id`: Unique record identifier, integer or numeric string
/// - `text`: The tweet body
/// - `user`: Author block
/// - `created_at`: Source-supplied timestamp, kept as an opaque string
/// - `location`: Raw location value as supplied by the source (usually a
///   `{lat, lon}` object, but may be anything)
/// - `hashtags`: Lowercased hashtags, extracted from `text` when absent
/// - `hashtag_count` / `hashtag_frequency`: Hashtag stage output
/// - `geo` / `region` / `location_normalized`: Location stage output
/// - `sentiment`: Sentiment stage output
/// - `retweet_count` / `favorite_count`: Source engagement counters
/// - `processed` / `processed_at`: Stamped when the pipeline republishes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TweetRecord {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<TweetUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtag_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtag_frequency: Option<HashMap<String, usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_normalized: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retweet_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    /// Unknown top-level fields, preserved verbatim through the pipeline.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TweetRecord {
    /// Create a bare record with the given id and everything else unset.
    ///
    /// # Example
    ///
    /// ```
    /// use pulse_shared::{RecordId, TweetRecord};
    ///
    /// let record = TweetRecord::new(RecordId::Int(1050));
    /// assert!(record.text.is_none());
    /// assert!(record.sentiment.is_none());
    /// ```
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            text: None,
            user: None,
            created_at: None,
            location: None,
            hashtags: None,
            hashtag_count: None,
            hashtag_frequency: None,
            geo: None,
            region: None,
            location_normalized: None,
            sentiment: None,
            retweet_count: None,
            favorite_count: None,
            processed: None,
            processed_at: None,
            extra: Map::new(),
        }
    }

    /// Create a record with an id and body text. Convenience for tests.
    pub fn with_text(id: RecordId, text: impl Into<String>) -> Self {
        let mut record = Self::new(id);
        record.text = Some(text.into());
        record
    }

    /// The id used for the document in the search index.
    ///
    /// Writes are keyed by record id so that reprocessing a record replaces
    /// its document instead of duplicating it.
    pub fn document_id(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_as_i64() {
        assert_eq!(RecordId::Int(1050).as_i64(), Some(1050));
        assert_eq!(RecordId::Text("1051".to_string()).as_i64(), Some(1051));
        assert_eq!(RecordId::Text(" 1052 ".to_string()).as_i64(), Some(1052));
        assert_eq!(RecordId::Text("abc".to_string()).as_i64(), None);
        assert_eq!(RecordId::Text("".to_string()).as_i64(), None);
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId::Int(7).to_string(), "7");
        assert_eq!(RecordId::Text("7".to_string()).to_string(), "7");
    }

    #[test]
    fn test_record_id_deserializes_both_forms() {
        let int_id: RecordId = serde_json::from_value(json!(1050)).unwrap();
        assert_eq!(int_id, RecordId::Int(1050));

        let text_id: RecordId = serde_json::from_value(json!("1050")).unwrap();
        assert_eq!(text_id, RecordId::Text("1050".to_string()));
    }

    #[test]
    fn test_minimal_record_deserializes() {
        let record: TweetRecord = serde_json::from_value(json!({"id": 42})).unwrap();
        assert_eq!(record.id, RecordId::Int(42));
        assert!(record.text.is_none());
        assert!(record.user.is_none());
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let input = json!({
            "id": 1,
            "text": "hello",
            "lang": "en",
            "user": {"screen_name": "alice", "verified": true}
        });

        let record: TweetRecord = serde_json::from_value(input).unwrap();
        assert_eq!(record.extra.get("lang"), Some(&json!("en")));
        let user = record.user.as_ref().unwrap();
        assert_eq!(user.extra.get("verified"), Some(&json!(true)));

        let output = serde_json::to_value(&record).unwrap();
        assert_eq!(output["lang"], json!("en"));
        assert_eq!(output["user"]["verified"], json!(true));
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let record = TweetRecord::with_text(RecordId::Int(1), "no enrichment yet");
        let output = serde_json::to_value(&record).unwrap();

        let object = output.as_object().unwrap();
        assert!(!object.contains_key("sentiment"));
        assert!(!object.contains_key("geo"));
        assert!(!object.contains_key("processed"));
        assert_eq!(object.get("text"), Some(&json!("no enrichment yet")));
    }

    #[test]
    fn test_document_id_matches_record_id() {
        assert_eq!(TweetRecord::new(RecordId::Int(1050)).document_id(), "1050");
        assert_eq!(
            TweetRecord::new(RecordId::Text("1050".to_string())).document_id(),
            "1050"
        );
    }
}
