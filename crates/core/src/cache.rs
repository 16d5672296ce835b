//! In-memory response cache keyed by request path
//!
//! Entries never expire and are never evicted. An entry is only replaced
//! when a caller explicitly asks for a fresh value. Values are handed out
//! as [`Arc`]s so every hit returns the very same object.
//!
//! # Example
//!
//! ```rust
//! use clubhouse_core::cache::ResponseCache;
//!
//! let cache: ResponseCache<String> = ResponseCache::new();
//!
//! cache.set("/groups/7/standings", "table".to_string()).unwrap();
//!
//! if let Some(value) = cache.get("/groups/7/standings").unwrap() {
//!     println!("Cached: {value}");
//! }
//! ```

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Path-keyed cache owned by a single adapter instance
pub struct ResponseCache<V> {
    entries: RwLock<HashMap<String, Arc<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ResponseCache<V> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get a cached value, recording a hit or a miss
    pub fn get(&self, key: &str) -> Result<Option<Arc<V>>> {
        let guard = self.entries.read().map_err(|_| Error::cache_poisoned())?;

        let found = guard.get(key).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        Ok(found)
    }

    /// Store a value, replacing any previous entry for the key
    pub fn set(&self, key: impl Into<String>, value: V) -> Result<Arc<V>> {
        let value = Arc::new(value);
        let mut guard = self.entries.write().map_err(|_| Error::cache_poisoned())?;
        guard.insert(key.into(), Arc::clone(&value));
        Ok(value)
    }

    /// Remove a cached value
    pub fn invalidate(&self, key: &str) -> Result<bool> {
        let mut guard = self.entries.write().map_err(|_| Error::cache_poisoned())?;
        Ok(guard.remove(key).is_some())
    }

    /// Clear all cached values
    pub fn clear(&self) -> Result<()> {
        let mut guard = self.entries.write().map_err(|_| Error::cache_poisoned())?;
        guard.clear();
        Ok(())
    }

    /// Check whether a key is cached without touching the hit counters
    pub fn contains(&self, key: &str) -> Result<bool> {
        let guard = self.entries.read().map_err(|_| Error::cache_poisoned())?;
        Ok(guard.contains_key(key))
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        let guard = self.entries.read().map_err(|_| Error::cache_poisoned())?;
        let mut keys: Vec<String> = guard.keys().cloned().collect();
        keys.sort();

        Ok(CacheStats {
            entries: guard.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            keys,
        })
    }

    /// Return the cached value, or run `fetch` and store its result
    ///
    /// With `refresh` set the cache is bypassed, the lookup counts as a
    /// miss and the fetched value replaces the existing entry. No lock is held while `fetch` runs, so
    /// two concurrent misses on the same key both fetch and the last one
    /// to finish wins.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, refresh: bool, fetch: F) -> std::result::Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
        E: From<Error>,
    {
        if refresh {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else if let Some(value) = self.get(key)? {
            return Ok(value);
        }

        let value = fetch().await?;
        Ok(self.set(key, value)?)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Number of cached entries
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing or were bypassed by a refresh
    pub misses: u64,
    /// Cached keys, sorted
    pub keys: Vec<String>,
}
