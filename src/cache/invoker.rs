//! Memoizing invoker for provider calls
//!
//! The caching policy as a first-class component: every handler operation
//! funnels through [`MemoizingInvoker::invoke`] with a derived key and a
//! producer closure for the remote call, so hit/miss/expiry behavior lives
//! in exactly one place.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::cache::store::{CacheStats, CacheStore, ClearStats};
use crate::error::{CacheError, Result};

/// Memoizes async producer results in a TTL'd backing store.
///
/// The TTL is fixed at construction and applies to every entry, so the
/// staleness window is uniform across operations. The store sits behind a
/// mutex; lookups and writes are individually atomic while the producer
/// runs outside the lock, so concurrent misses on one key may duplicate
/// work and the last writer wins. Results are an idempotent function of
/// the key, which makes that safe.
pub struct MemoizingInvoker {
    store: Mutex<Box<dyn CacheStore>>,
    ttl: Duration,
}

impl MemoizingInvoker {
    /// Wrap a backing store with the given entry TTL
    pub fn new(store: Box<dyn CacheStore>, ttl: Duration) -> Self {
        Self {
            store: Mutex::new(store),
            ttl,
        }
    }

    /// Entry TTL applied to every stored result
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value for `key`, or produce, store, and return it.
    ///
    /// A producer failure propagates unchanged and nothing is cached, so a
    /// later call with the same key retries the remote call. A cached
    /// entry that no longer decodes is discarded and treated as a miss.
    pub async fn invoke<T, F, Fut>(&self, operation: &str, key: &str, producer: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        {
            let mut store = self.store.lock().map_err(|_| CacheError::Poisoned)?;
            if let Some(bytes) = store.get(key)? {
                match serde_json::from_slice(&bytes) {
                    Ok(value) => {
                        log::debug!("Cache hit: {}", operation);
                        return Ok(value);
                    }
                    Err(e) => {
                        log::warn!("Discarding undecodable cache entry for {}: {}", operation, e);
                    }
                }
            }
        }

        log::debug!("Cache miss: {}", operation);
        let value = producer().await?;

        let bytes =
            serde_json::to_vec(&value).map_err(|e| CacheError::Encode(e.to_string()))?;
        let mut store = self.store.lock().map_err(|_| CacheError::Poisoned)?;
        store.put(key, &bytes, operation, self.ttl)?;
        Ok(value)
    }

    /// Evict every entry regardless of key or expiry
    pub fn clear(&self) -> Result<ClearStats> {
        let mut store = self.store.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(store.clear_all()?)
    }

    /// Entry and size statistics from the backing store
    pub fn stats(&self) -> Result<CacheStats> {
        let mut store = self.store.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(store.stats()?)
    }
}
