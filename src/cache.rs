//! Time-bounded key/value cache.
//!
//! Entries are never evicted eagerly. A read that finds an entry older than
//! the freshness window reports a miss and leaves the entry in place until it
//! is overwritten or the whole cache is cleared. There is no capacity limit.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default freshness window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

pub struct TtlCache<V> {
    ttl: Duration,
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a copy of the value if it was stored less than `ttl` ago.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let entry = self.entries.get(key)?;
        if now.saturating_duration_since(entry.stored_at) < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.set_at(key.into(), value, Instant::now());
    }

    fn set_at(&mut self, key: String, value: V, stored_at: Instant) {
        self.entries.insert(key, CacheEntry { value, stored_at });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_hit_returns_stored_value() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.set("https://molsen.ca/api/essays.json", vec![1, 2, 3]);
        assert_eq!(
            cache.get("https://molsen.ca/api/essays.json"),
            Some(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_missing_key() {
        let cache: TtlCache<String> = TtlCache::default();
        assert_eq!(cache.get("nope"), None);
        assert_eq!(cache.ttl(), DEFAULT_TTL);
    }

    #[test]
    fn test_stale_entry_reads_as_miss_but_is_kept() {
        let mut cache = TtlCache::new(Duration::from_secs(300));
        let start = Instant::now();
        cache.set_at("k".to_string(), "v", start);

        assert_eq!(cache.get_at("k", start + Duration::from_secs(299)), Some("v"));
        assert_eq!(cache.get_at("k", start + Duration::from_secs(300)), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overwrite_refreshes_timestamp() {
        let mut cache = TtlCache::new(Duration::from_secs(10));
        let start = Instant::now();
        cache.set_at("k".to_string(), 1, start);
        cache.set_at("k".to_string(), 2, start + Duration::from_secs(20));
        assert_eq!(cache.get_at("k", start + Duration::from_secs(25)), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.set("a", 1);
        cache.set("b", 2);
        cache.clear();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }
}
