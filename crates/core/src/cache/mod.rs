//! Content-addressed extraction cache.
//!
//! Maps a URL fingerprint to a previously extracted page, with a TTL and a
//! maximum entry count enforced by recency eviction. Corrupt records degrade
//! to misses; they never propagate as errors.

pub mod hash;

pub use hash::fingerprint;

use crate::store::RecordStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default time-to-live for cached extractions (24 hours).
pub const DEFAULT_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Default maximum number of cached extractions.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// A cached page extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub url: String,
    pub content: String,
    pub title: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
}

/// Read-only audit of the cache contents.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub valid: usize,
    pub expired: usize,
    pub total_size_bytes: u64,
}

/// Extraction cache over a [`RecordStore`].
pub struct ExtractCache {
    store: Arc<dyn RecordStore>,
    ttl_ms: i64,
    max_entries: usize,
}

impl ExtractCache {
    pub fn new(store: Arc<dyn RecordStore>, ttl_ms: i64, max_entries: usize) -> Self {
        Self { store, ttl_ms, max_entries }
    }

    /// TTL in milliseconds.
    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Look up a cached extraction by URL.
    ///
    /// Misses on absent or corrupt records. An entry past its TTL is a miss
    /// and is deleted as a side effect.
    pub fn lookup(&self, url: &str) -> Option<CacheEntry> {
        let key = fingerprint(url);
        let bytes = self.store.get(&key).ok().flatten()?;

        let Ok(entry) = serde_json::from_slice::<CacheEntry>(&bytes) else {
            tracing::debug!(key, "corrupt cache record treated as miss");
            return None;
        };

        if now_ms() - entry.timestamp > self.ttl_ms {
            tracing::debug!(key, "cache entry expired, deleting");
            let _ = self.store.delete(&key);
            return None;
        }

        Some(entry)
    }

    /// Store an extraction, then evict beyond the entry limit.
    pub fn store(&self, url: &str, title: &str, content: &str) -> Result<(), std::io::Error> {
        let entry = CacheEntry {
            url: url.to_string(),
            content: content.to_string(),
            title: title.to_string(),
            timestamp: now_ms(),
        };
        let bytes = serde_json::to_vec(&entry).expect("cache entry serializes");
        self.store.put(&fingerprint(url), &bytes)?;
        self.evict()
    }

    /// Delete entries beyond `max_entries`, most recently modified kept.
    ///
    /// Idempotent; safe on an empty store.
    fn evict(&self) -> Result<(), std::io::Error> {
        let mut records = self.store.list()?;
        records.sort_by(|a, b| b.modified.cmp(&a.modified));

        for record in records.iter().skip(self.max_entries) {
            tracing::debug!(key = record.key, "evicting cache entry beyond limit");
            self.store.delete(&record.key)?;
        }
        Ok(())
    }

    /// Classify all entries as valid or expired without deleting anything.
    ///
    /// Corrupt records count as expired.
    pub fn stats(&self) -> Result<CacheStats, std::io::Error> {
        let now = now_ms();
        let mut stats = CacheStats { valid: 0, expired: 0, total_size_bytes: 0 };

        for record in self.store.list()? {
            stats.total_size_bytes += record.size;
            let entry = self
                .store
                .get(&record.key)?
                .and_then(|bytes| serde_json::from_slice::<CacheEntry>(&bytes).ok());
            match entry {
                Some(entry) if now - entry.timestamp <= self.ttl_ms => stats.valid += 1,
                _ => stats.expired += 1,
            }
        }
        Ok(stats)
    }

    /// Delete all entries, returning how many were removed.
    pub fn clear(&self) -> Result<usize, std::io::Error> {
        let records = self.store.list()?;
        let mut removed = 0;
        for record in records {
            if self.store.delete(&record.key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    fn make_cache(max_entries: usize) -> (Arc<MemStore>, ExtractCache) {
        let store = Arc::new(MemStore::new());
        let cache = ExtractCache::new(store.clone(), DEFAULT_TTL_MS, max_entries);
        (store, cache)
    }

    #[test]
    fn test_store_then_lookup() {
        let (_store, cache) = make_cache(50);
        cache.store("https://example.com/a", "Title A", "body text").unwrap();

        let entry = cache.lookup("https://example.com/a").unwrap();
        assert_eq!(entry.title, "Title A");
        assert_eq!(entry.content, "body text");
        assert_eq!(entry.url, "https://example.com/a");
    }

    #[test]
    fn test_lookup_miss() {
        let (_store, cache) = make_cache(50);
        assert!(cache.lookup("https://example.com/unknown").is_none());
    }

    #[test]
    fn test_expired_entry_is_miss_and_deleted() {
        let (store, cache) = make_cache(50);

        let stale = CacheEntry {
            url: "https://example.com/old".into(),
            content: "old body".into(),
            title: "Old".into(),
            timestamp: now_ms() - DEFAULT_TTL_MS - 1000,
        };
        let key = fingerprint("https://example.com/old");
        store.put(&key, &serde_json::to_vec(&stale).unwrap()).unwrap();

        assert!(cache.lookup("https://example.com/old").is_none());
        // stale record removed as a side effect of the miss
        assert!(store.get(&key).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_entry_is_miss() {
        let (store, cache) = make_cache(50);
        let key = fingerprint("https://example.com/bad");
        store.put(&key, b"{not json").unwrap();

        assert!(cache.lookup("https://example.com/bad").is_none());
        // corruption does not trigger deletion on lookup
        assert!(store.get(&key).unwrap().is_some());
    }

    #[test]
    fn test_eviction_keeps_most_recent() {
        let (_store, cache) = make_cache(3);
        for i in 0..5 {
            cache
                .store(&format!("https://example.com/{i}"), "t", "c")
                .unwrap();
        }

        assert!(cache.lookup("https://example.com/0").is_none());
        assert!(cache.lookup("https://example.com/1").is_none());
        assert!(cache.lookup("https://example.com/2").is_some());
        assert!(cache.lookup("https://example.com/3").is_some());
        assert!(cache.lookup("https://example.com/4").is_some());
    }

    #[test]
    fn test_stats_counts_expired_and_corrupt() {
        let (store, cache) = make_cache(50);
        cache.store("https://example.com/fresh", "t", "c").unwrap();

        let stale = CacheEntry {
            url: "https://example.com/stale".into(),
            content: "x".into(),
            title: "t".into(),
            timestamp: now_ms() - DEFAULT_TTL_MS - 1000,
        };
        store
            .put(&fingerprint("https://example.com/stale"), &serde_json::to_vec(&stale).unwrap())
            .unwrap();
        store.put(&fingerprint("https://example.com/bad"), b"garbage").unwrap();

        let stats = cache.stats().unwrap();
        assert_eq!(stats.valid, 1);
        assert_eq!(stats.expired, 2);
        assert!(stats.total_size_bytes > 0);

        // stats is read-only: nothing was deleted
        assert_eq!(store.list().unwrap().len(), 3);
    }

    #[test]
    fn test_clear() {
        let (_store, cache) = make_cache(50);
        cache.store("https://example.com/a", "t", "c").unwrap();
        cache.store("https://example.com/b", "t", "c").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert_eq!(cache.clear().unwrap(), 0);
        assert!(cache.lookup("https://example.com/a").is_none());
    }

    #[test]
    fn test_store_overwrites_same_url() {
        let (store, cache) = make_cache(50);
        cache.store("https://example.com/a", "old", "old body").unwrap();
        cache.store("https://example.com/a", "new", "new body").unwrap();

        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(cache.lookup("https://example.com/a").unwrap().title, "new");
    }
}
