//! Time-boxed in-memory cache for aggregation responses.
//!
//! Dashboard refreshes hit the aggregation endpoints with the same query
//! over and over. Responses are cached as serialized JSON keyed by endpoint
//! and parameters, and expire after a fixed TTL. The cache can be disabled
//! entirely via configuration.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::debug;

/// Default time-to-live for cached responses.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// TTL cache mapping request keys to serialized responses.
pub struct ResponseCache {
    enabled: bool,
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, Value)>>,
}

impl ResponseCache {
    /// Create a cache with the given TTL.
    pub fn new(enabled: bool, ttl: Duration) -> Self {
        Self {
            enabled,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Create a cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(false, DEFAULT_CACHE_TTL)
    }

    /// Look up an unexpired entry.
    pub fn get(&self, key: &str) -> Option<Value> {
        if !self.enabled {
            return None;
        }

        let entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => {
                debug!(key = key, "Cache hit");
                Some(value.clone())
            }
            _ => None,
        }
    }

    /// Store a response, dropping any expired entries on the way.
    pub fn put(&self, key: impl Into<String>, value: Value) {
        if !self.enabled {
            return;
        }

        let mut entries = self.entries.lock().unwrap();
        let now = Instant::now();
        entries.retain(|_, (stored_at, _)| now.duration_since(*stored_at) < self.ttl);
        entries.insert(key.into(), (now, value));
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}
