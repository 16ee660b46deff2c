use anyhow::Result;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct CacheValue<V> {
    value: V,
    expires_at: Option<Instant>,
}

/// In-memory cache with optional per-entry expiry and single-flight fetches.
#[derive(Clone)]
pub struct Cache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    entries: Arc<Mutex<HashMap<K, CacheValue<V>>>>,
    in_flight: Arc<Mutex<HashMap<K, Arc<Mutex<()>>>>>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let cache = self.entries.lock().await;
        if let Some(entry) = cache.get(key) {
            if entry.expires_at.is_some_and(|expiry| expiry <= Instant::now()) {
                debug!("Cache entry expired for key: {:?}", key);
                return None;
            }
            debug!("Cache HIT for key: {:?}", key);
            return Some(entry.value.clone());
        }
        debug!("Cache MISS for key: {:?}", key);
        None
    }

    pub async fn put(&self, key: K, value: V, ttl: Option<Duration>) {
        let expires_at = ttl.map(|duration| Instant::now() + duration);
        let mut cache = self.entries.lock().await;
        debug!("Cache PUT for key: {:?}", key);
        cache.insert(key, CacheValue { value, expires_at });
    }

    /// Returns the cached value for `key`, or runs `fetch` and caches its result.
    ///
    /// Concurrent callers for the same key wait for the fetch already in
    /// flight instead of starting their own. Errors are not cached.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, ttl: Option<Duration>, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }

        let key_lock = {
            let mut in_flight = self.in_flight.lock().await;
            Arc::clone(in_flight.entry(key.clone()).or_default())
        };
        let guard = key_lock.lock().await;

        // Another caller may have filled the entry while we waited.
        let result = match self.get(&key).await {
            Some(value) => Ok(value),
            None => {
                let result = fetch().await;
                if let Ok(value) = &result {
                    self.put(key.clone(), value.clone(), ttl).await;
                }
                result
            }
        };

        // Callers still queued on the guard hold their own clones of it; the
        // last one out removes it from the map.
        let mut in_flight = self.in_flight.lock().await;
        let last = Arc::strong_count(&key_lock) <= 2;
        drop(guard);
        drop(key_lock);
        if last {
            in_flight.remove(&key);
        }
        result
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}
