// ABOUTME: In-memory cache backend with LRU eviction and TTL support
// ABOUTME: Includes background cleanup task for expired entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use super::{CacheBackend, CacheConfig, CacheError};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storefront_core::constants::cache::MAX_TTL_SECS;
use tokio::sync::RwLock;

/// In-memory cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Duration) -> Self {
        let now = Instant::now();
        let ttl = ttl.min(Duration::from_secs(MAX_TTL_SECS));
        Self {
            data,
            expires_at: now.checked_add(ttl).unwrap_or(now),
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

type Store = Arc<RwLock<LruCache<String, CacheEntry>>>;

/// In-memory cache with LRU eviction and background cleanup
///
/// The store is shared with the cleanup task, which removes expired entries on an
/// interval until the cache is dropped. Expired entries are also dropped lazily on read.
#[derive(Clone)]
pub struct InMemoryCache {
    store: Store,
    shutdown_tx: Option<Arc<tokio::sync::mpsc::Sender<()>>>,
}

impl InMemoryCache {
    /// Default cache capacity when config specifies zero entries
    const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create new in-memory cache with optional background cleanup task
    ///
    /// The cleanup task is spawned on the current Tokio runtime, so with
    /// `enable_background_cleanup` set this must be called from within one.
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let capacity =
            NonZeroUsize::new(config.max_entries).unwrap_or(Self::DEFAULT_CACHE_CAPACITY);
        let store: Store = Arc::new(RwLock::new(LruCache::new(capacity)));

        let shutdown_tx = if config.enable_background_cleanup {
            let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);
            let store_clone = store.clone();
            let cleanup_interval = config.cleanup_interval();
            if config.cleanup_interval_secs == 0 {
                tracing::warn!(
                    interval_secs = cleanup_interval.as_secs(),
                    "Cache cleanup interval of zero is not allowed, using minimum"
                );
            }

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(cleanup_interval);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            Self::cleanup_expired(&store_clone).await;
                        }
                        _ = shutdown_rx.recv() => {
                            tracing::debug!("Cache cleanup task received shutdown signal");
                            break;
                        }
                    }
                }
            });

            Some(Arc::new(shutdown_tx))
        } else {
            None
        };

        Self { store, shutdown_tx }
    }

    /// Remove all expired entries from cache
    async fn cleanup_expired(store: &Store) {
        let mut store_guard = store.write().await;

        let expired_keys: Vec<String> = store_guard
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            store_guard.pop(key);
        }
        drop(store_guard);

        if !expired_keys.is_empty() {
            tracing::debug!("Cleaned up {} expired cache entries", expired_keys.len());
        }
    }

    /// Number of live (unexpired) entries
    pub async fn len(&self) -> usize {
        self.store
            .read()
            .await
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .count()
    }

    /// Whether the cache holds no live entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl CacheBackend for InMemoryCache {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut store = self.store.write().await;

        // LruCache::get is mutable (updates access order for LRU)
        let Some(entry) = store.get(key) else {
            return Ok(None);
        };
        if entry.is_expired() {
            store.pop(key);
            return Ok(None);
        }
        Ok(Some(entry.data.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        // LruCache handles eviction automatically on push
        self.store
            .write()
            .await
            .push(key.to_owned(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<u64, CacheError> {
        let removed = self.store.write().await.pop(key);
        Ok(u64::from(removed.is_some_and(|entry| !entry.is_expired())))
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64, CacheError> {
        let mut store = self.store.write().await;
        let removed = keys
            .iter()
            .filter_map(|key| store.pop(key))
            .filter(|entry| !entry.is_expired())
            .count();
        drop(store);
        Ok(removed as u64)
    }

    async fn scan(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let glob_pattern = glob::Pattern::new(pattern).map_err(|e| CacheError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: e.to_string(),
        })?;

        let store = self.store.read().await;
        let keys = store
            .iter()
            .filter(|(key, entry)| !entry.is_expired() && glob_pattern.matches(key))
            .map(|(key, _)| key.clone())
            .collect();
        drop(store);
        Ok(keys)
    }

    async fn health_check(&self) -> Result<(), CacheError> {
        // In-memory cache is always healthy
        Ok(())
    }
}

impl Drop for InMemoryCache {
    fn drop(&mut self) {
        // Only the last clone holds the sole Arc to the sender
        if let Some(tx) = &self.shutdown_tx {
            if Arc::strong_count(tx) == 1 {
                if let Err(e) = tx.try_send(()) {
                    tracing::debug!(error = ?e, "Cache shutdown signal send failed (channel likely closed)");
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_cache() -> InMemoryCache {
        InMemoryCache::new(&CacheConfig {
            enable_background_cleanup: false,
            ..CacheConfig::default()
        })
    }

    #[tokio::test]
    async fn test_scan_matches_glob() {
        let cache = test_cache();
        let ttl = Duration::from_secs(60);
        cache.set("settings:product_card_showBrand", b"1", ttl).await.unwrap();
        cache.set("settings:product_card_showOrigin", b"1", ttl).await.unwrap();
        cache.set("settings:site_name", b"1", ttl).await.unwrap();

        let mut keys = cache.scan("settings:product_card_*").await.unwrap();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "settings:product_card_showBrand".to_owned(),
                "settings:product_card_showOrigin".to_owned()
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_glob_is_rejected() {
        let cache = test_cache();
        assert!(matches!(
            cache.scan("settings:[").await,
            Err(CacheError::InvalidPattern { .. })
        ));
    }

    #[tokio::test]
    async fn test_lru_eviction_respects_capacity() {
        let cache = InMemoryCache::new(&CacheConfig {
            max_entries: 2,
            enable_background_cleanup: false,
            ..CacheConfig::default()
        });
        let ttl = Duration::from_secs(60);
        cache.set("a", b"1", ttl).await.unwrap();
        cache.set("b", b"2", ttl).await.unwrap();
        cache.set("c", b"3", ttl).await.unwrap();

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_zero_cleanup_interval_still_sweeps() {
        let cache = InMemoryCache::new(&CacheConfig {
            cleanup_interval_secs: 0,
            ..CacheConfig::default()
        });
        cache.set("short", b"1", Duration::from_millis(20)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1_200)).await;

        assert_eq!(cache.store.read().await.len(), 0);
    }

    #[test]
    fn test_entry_expiry_is_capped() {
        let entry = CacheEntry::new(b"1".to_vec(), Duration::from_secs(u64::MAX));
        let remaining = entry.expires_at.saturating_duration_since(Instant::now());

        assert!(!entry.is_expired());
        assert!(remaining <= Duration::from_secs(MAX_TTL_SECS));
    }
}
