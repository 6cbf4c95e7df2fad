use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self) -> bool {
        self.stored_at.elapsed() >= self.ttl
    }
}

/// Key/value cache whose entries expire after a time-to-live.
/// Expired entries are never returned; they are dropped lazily on access
/// or in bulk by `cleanup_expired`.
#[derive(Clone)]
pub struct TtlCache<V> {
    storage: Arc<Mutex<HashMap<String, CacheEntry<V>>>>,
    default_ttl: Duration,
}

impl<V: Clone + Send> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
            default_ttl,
        }
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        let mut storage = self.storage.lock().await;

        match storage.get(key) {
            Some(entry) if entry.is_expired() => {
                storage.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    /// Store with the default TTL
    pub async fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    pub async fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let mut storage = self.storage.lock().await;
        storage.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Returns whether a live entry was removed
    pub async fn delete(&self, key: &str) -> bool {
        let mut storage = self.storage.lock().await;
        storage.remove(key).is_some_and(|entry| !entry.is_expired())
    }

    /// Drop every entry whose key starts with `prefix`; returns how many went.
    pub async fn delete_prefix(&self, prefix: &str) -> usize {
        let mut storage = self.storage.lock().await;
        let before = storage.len();
        storage.retain(|key, _| !key.starts_with(prefix));
        before - storage.len()
    }

    pub async fn cleanup_expired(&self) {
        let mut storage = self.storage.lock().await;
        storage.retain(|_, entry| !entry.is_expired());
    }

    /// Number of stored entries, expired ones included until cleaned up
    pub async fn len(&self) -> usize {
        self.storage.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.storage.lock().await.is_empty()
    }
}
