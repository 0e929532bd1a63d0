//! Search request body builders.
//!
//! Each function turns a typed query from `pulse-shared` into the JSON body
//! sent to the search backend. Filters combine under `bool.must`; a query
//! with no filters falls back to `match_all`.

use serde_json::{json, Value};

use pulse_shared::{MapQuery, TrendsQuery, TweetQuery};

/// Combine filter clauses into a query, or `match_all` when there are none.
fn bool_query(must: Vec<Value>) -> Value {
    if must.is_empty() {
        json!({ "match_all": {} })
    } else {
        json!({ "bool": { "must": must } })
    }
}

/// Body for the tweet search endpoint: filters, newest-first sort, and
/// pagination.
pub fn build_search_body(query: &TweetQuery) -> Value {
    let mut must = Vec::new();

    if let Some(text) = &query.text {
        must.push(json!({ "match": { "text": text } }));
    }
    if let Some(hashtag) = &query.hashtag {
        must.push(json!({ "term": { "hashtags": hashtag.to_lowercase() } }));
    }
    if let Some(sentiment) = &query.sentiment {
        must.push(json!({ "term": { "sentiment.label": sentiment.as_str() } }));
    }
    if let Some(region) = &query.region {
        must.push(json!({ "term": { "region": region.as_str() } }));
    }

    json!({
        "query": bool_query(must),
        "sort": [{ "created_at": { "order": "desc" } }],
        "from": query.offset,
        "size": query.limit
    })
}

/// Body for the trending hashtags aggregation.
pub fn build_trends_body(query: &TrendsQuery) -> Value {
    let mut must = Vec::new();

    if let Some(text) = &query.text {
        must.push(json!({ "match": { "text": text } }));
    }
    if let Some(sentiment) = &query.sentiment {
        must.push(json!({ "term": { "sentiment.label": sentiment.as_str() } }));
    }

    json!({
        "query": bool_query(must),
        "size": 0,
        "aggs": {
            "hashtags": {
                "terms": { "field": "hashtags", "size": query.limit }
            }
        }
    })
}

/// Body for the per-region counts aggregation. The region bucketing yields at
/// most six values, so a terms size of 10 always covers them.
pub fn build_regions_body() -> Value {
    json!({
        "query": { "match_all": {} },
        "size": 0,
        "aggs": {
            "regions": {
                "terms": { "field": "region", "size": 10 }
            }
        }
    })
}

/// Body for the sentiment distribution aggregation.
pub fn build_sentiment_body() -> Value {
    json!({
        "query": { "match_all": {} },
        "size": 0,
        "aggs": {
            "sentiments": {
                "terms": { "field": "sentiment.label" }
            }
        }
    })
}

/// Body for the map overlay: only documents with coordinates qualify, and
/// the response is trimmed to the fields the map needs.
pub fn build_map_body(query: &MapQuery) -> Value {
    let mut must = vec![json!({ "exists": { "field": "geo" } })];

    if let Some(sentiment) = &query.sentiment {
        must.push(json!({ "term": { "sentiment.label": sentiment.as_str() } }));
    }
    if let Some(hashtag) = &query.hashtag {
        must.push(json!({ "term": { "hashtags": hashtag.to_lowercase() } }));
    }

    json!({
        "query": { "bool": { "must": must } },
        "_source": ["id", "text", "geo", "sentiment", "hashtags"],
        "size": query.limit
    })
}
