use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::clock::Clock;

/// Canonical, order-independent key over the full upstream parameter set,
/// credentials included (they are constant per deployment).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Vec<(String, String)>);

impl CacheKey {
    /// Canonicalize a parameter list. Sorting makes two requests with the
    /// same parameters in different query-string orders compare equal.
    pub fn from_params(params: &[(String, String)]) -> Self {
        let mut pairs = params.to_vec();
        pairs.sort();
        CacheKey(pairs)
    }
}

/// TTL-bounded store for upstream payloads.
///
/// Expired entries are removed by the lookup that finds them stale; there
/// is no background sweep and no size bound. Entries are replaced whole on
/// re-fetch, never mutated in place.
#[derive(Clone)]
pub struct ResponseCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Arc<RwLock<HashMap<CacheKey, CacheEntry>>>,
}

struct CacheEntry {
    stored_at: Instant,
    payload: Value,
}

impl ResponseCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fetch a still-valid payload, evicting the entry if it has expired.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let now = self.clock.now();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());

        let expired = match entries.get(key) {
            Some(entry) if now.duration_since(entry.stored_at) <= self.ttl => {
                return Some(entry.payload.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(key);
        }
        None
    }

    /// Store a fresh payload, replacing any previous entry for the key.
    pub fn put(&self, key: CacheKey, payload: Value) {
        let entry = CacheEntry {
            stored_at: self.clock.now(),
            payload,
        };
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, entry);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}
