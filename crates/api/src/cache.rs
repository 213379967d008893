//! A small process-wide TTL cache.
//!
//! Each cache owns one key namespace and a fixed time-to-live. Concurrent
//! misses may each recompute; the last writer wins.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

struct Entry<T> {
    value: T,
    stored_at: Instant,
}

pub struct TtlCache<T> {
    namespace: &'static str,
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(namespace: &'static str, ttl: Duration) -> Self {
        Self {
            namespace,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}:{key}", self.namespace)
    }

    /// The cached value for `key`, if it was stored less than one TTL ago.
    pub async fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().await;
        entries
            .get(&self.full_key(key))
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub async fn insert(&self, key: &str, value: T) {
        let mut entries = self.entries.write().await;
        entries.insert(
            self.full_key(key),
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Return the cached value, or compute, store and return a fresh one.
    ///
    /// A failed computation is returned as-is and nothing is stored.
    pub async fn get_or_try_insert<E, F, Fut>(&self, key: &str, compute: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get(key).await {
            tracing::debug!(namespace = self.namespace, key, "Cache hit");
            return Ok(hit);
        }
        tracing::debug!(namespace = self.namespace, key, "Cache miss");
        let value = compute().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }
}
