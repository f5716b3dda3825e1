use crate::cache::key::cache_key;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// A cached value along with the time it was stored
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    url: String,
    stored_at: DateTime<Utc>,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// An entry is fresh while its age does not exceed its TTL
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.stored_at > self.ttl
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub default_ttl_hours: i64,
    pub age_seconds: i64,
}

/// In-memory cache with wall-clock TTL expiry
///
/// Expired entries are dropped when they are read; there is no size bound
/// and no background eviction.
#[derive(Debug, Clone)]
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
    created_at: DateTime<Utc>,
}

impl<V: Clone> TtlCache<V> {
    /// Creates an empty cache with the given default time-to-live
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
            created_at: Utc::now(),
        }
    }

    /// Creates an empty cache whose entries live for `hours` hours
    pub fn with_ttl_hours(hours: u64) -> Self {
        let hours = i64::try_from(hours).unwrap_or(i64::MAX / 3600);
        Self::new(Duration::try_hours(hours).unwrap_or(Duration::MAX))
    }

    /// Returns the default time-to-live
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Retrieves a cached value if it has not expired
    pub fn get(&mut self, url: &str, selector_key: &str) -> Option<V> {
        self.get_at(url, selector_key, Utc::now())
    }

    /// Retrieves a cached value as seen at time `now`
    ///
    /// An expired entry is removed and None is returned.
    pub fn get_at(&mut self, url: &str, selector_key: &str, now: DateTime<Utc>) -> Option<V> {
        let key = cache_key(url, selector_key);
        let entry = self.entries.get(&key)?;

        if entry.is_expired(now) {
            self.entries.remove(&key);
            tracing::debug!("Cache EXPIRED: {}", url);
            return None;
        }

        tracing::debug!(
            "Cache HIT: {} (age: {}s)",
            url,
            (now - entry.stored_at).num_seconds()
        );
        Some(entry.value.clone())
    }

    /// Stores a value, optionally overriding the default time-to-live
    pub fn set(&mut self, url: &str, selector_key: &str, value: V, ttl: Option<Duration>) {
        self.set_at(url, selector_key, value, ttl, Utc::now());
    }

    /// Stores a value as if it were stored at time `now`
    pub fn set_at(
        &mut self,
        url: &str,
        selector_key: &str,
        value: V,
        ttl: Option<Duration>,
        now: DateTime<Utc>,
    ) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        self.entries.insert(
            cache_key(url, selector_key),
            CacheEntry {
                value,
                url: url.to_string(),
                stored_at: now,
                ttl,
            },
        );
        tracing::debug!("Cache SET: {} (TTL: {}h)", url, ttl.num_hours());
    }

    /// Removes all entries that have expired at time `now`
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            let expired = entry.is_expired(now);
            if expired {
                tracing::debug!("Cache PURGE: {}", entry.url);
            }
            !expired
        });
        let removed = before - self.entries.len();

        if removed > 0 {
            tracing::debug!("Purged {} expired cache entries", removed);
        }

        removed
    }

    /// Clears all cached entries
    pub fn clear(&mut self) {
        self.entries.clear();
        tracing::info!("Cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            default_ttl_hours: self.default_ttl.num_hours(),
            age_seconds: (Utc::now() - self.created_at).num_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/article";

    fn create_test_cache() -> TtlCache<String> {
        TtlCache::with_ttl_hours(24)
    }

    #[test]
    fn test_get_missing() {
        let mut cache = create_test_cache();
        assert!(cache.get(URL, "").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let mut cache = create_test_cache();
        cache.set(URL, "", "payload".to_string(), None);

        assert_eq!(cache.get(URL, ""), Some("payload".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_selector_key_separates_entries() {
        let mut cache = create_test_cache();
        cache.set(URL, "", "plain".to_string(), None);
        cache.set(URL, "title=h1", "custom".to_string(), None);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(URL, ""), Some("plain".to_string()));
        assert_eq!(cache.get(URL, "title=h1"), Some("custom".to_string()));
        assert!(cache.get(URL, "title=h2").is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let mut cache = create_test_cache();
        cache.set(URL, "", "old".to_string(), None);
        cache.set(URL, "", "new".to_string(), None);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(URL, ""), Some("new".to_string()));
    }

    #[test]
    fn test_ttl_boundary_is_inclusive() {
        let mut cache = create_test_cache();
        let stored = Utc::now();
        cache.set_at(URL, "", "v".to_string(), None, stored);

        let at_ttl = stored + Duration::hours(24);
        assert_eq!(cache.get_at(URL, "", at_ttl), Some("v".to_string()));
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let mut cache = create_test_cache();
        let stored = Utc::now();
        cache.set_at(URL, "", "v".to_string(), None, stored);

        let later = stored + Duration::hours(24) + Duration::seconds(1);
        assert!(cache.get_at(URL, "", later).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_per_entry_ttl_override() {
        let mut cache = create_test_cache();
        let stored = Utc::now();
        cache.set_at(URL, "", "short".to_string(), Some(Duration::minutes(5)), stored);

        let in_ten_minutes = stored + Duration::minutes(10);
        assert!(cache.get_at(URL, "", in_ten_minutes).is_none());
    }

    #[test]
    fn test_purge_expired() {
        let mut cache = create_test_cache();
        let stored = Utc::now();
        cache.set_at("https://a.example/", "", "a".to_string(), Some(Duration::hours(1)), stored);
        cache.set_at("https://b.example/", "", "b".to_string(), None, stored);

        let later = stored + Duration::hours(2);
        let removed = cache.purge_expired(later);
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_at("https://b.example/", "", later), Some("b".to_string()));
    }

    #[test]
    fn test_clear() {
        let mut cache = create_test_cache();
        cache.set(URL, "", "v".to_string(), None);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stats() {
        let mut cache = create_test_cache();
        cache.set(URL, "", "v".to_string(), None);

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.default_ttl_hours, 24);
        assert!(stats.age_seconds >= 0);
    }
}
