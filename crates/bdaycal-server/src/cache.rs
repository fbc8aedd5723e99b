//! Feed document cache with TTL (Time-To-Live) support.
//!
//! This module provides the in-memory cache that sits in front of the
//! pipeline: one entry per cache key, holding the built calendar document
//! and its build timestamp, expiring purely by TTL.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

/// Cache entry containing a built feed document and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The calendar document text.
    pub document: String,
    /// When the document was built.
    pub generated_at: DateTime<Utc>,
    /// When the entry expires (monotonic clock).
    expires_at: Instant,
}

impl CacheEntry {
    /// Creates a new cache entry with the given TTL.
    fn new(document: String, generated_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            document,
            generated_at,
            expires_at: Instant::now() + ttl,
        }
    }

    /// Returns true if the entry has expired.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Returns the time until expiration.
    pub fn time_until_expiry(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

/// In-memory feed cache with TTL support.
///
/// Expired entries behave as misses; a zero TTL disables storage
/// entirely, so every lookup misses and the pipeline recomputes.
#[derive(Debug, Default)]
pub struct FeedCache {
    /// Cache entries keyed by derived feed key.
    entries: HashMap<String, CacheEntry>,
}

impl FeedCache {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `key` if present and not expired.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key).filter(|entry| !entry.is_expired())
    }

    /// Stores a document under `key` with the given TTL.
    ///
    /// A zero TTL means caching is disabled: nothing is stored.
    pub fn put(
        &mut self,
        key: impl Into<String>,
        document: impl Into<String>,
        generated_at: DateTime<Utc>,
        ttl: Duration,
    ) {
        if ttl.is_zero() {
            trace!("Zero TTL, not storing cache entry");
            return;
        }

        let key = key.into();
        self.entries
            .insert(key.clone(), CacheEntry::new(document.into(), generated_at, ttl));
        debug!(key = %key, ttl_secs = ttl.as_secs(), "Stored cache entry");
    }

    /// Removes a cache entry.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key);
        if entry.is_some() {
            debug!(key = %key, "Removed cache entry");
        }
        entry
    }

    /// Clears all cache entries.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        debug!(count = count, "Cleared all cache entries");
    }

    /// Removes all expired entries.
    pub fn evict_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, entry| {
            let keep = !entry.is_expired();
            if !keep {
                trace!(key = %key, "Evicting expired cache entry");
            }
            keep
        });
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted = evicted, "Evicted expired cache entries");
        }
        evicted
    }

    /// Returns the number of cache entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
