// ABOUTME: Cache factory for environment-based backend selection
// ABOUTME: Chooses Redis when configured and falls back to in-memory when it is unreachable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use super::memory::InMemoryCache;
use super::redis::RedisCache;
use super::{CacheBackend, CacheConfig, CacheStore};
use std::sync::Arc;
use tracing::{error, info};

/// Create the process-wide cache backend.
///
/// Uses Redis when `redis_url` is set. If Redis cannot be reached at startup the
/// service still starts with a local in-memory cache: the cache is never allowed
/// to keep settings from being served.
pub async fn create_backend(config: &CacheConfig) -> Arc<dyn CacheBackend> {
    if let Some(redis_url) = config.redis_url.as_deref() {
        match RedisCache::connect(redis_url, &config.redis_connection).await {
            Ok(redis) => return Arc::new(redis),
            Err(e) => error!(
                error = %e,
                "Redis unavailable at startup, falling back to in-memory cache"
            ),
        }
    }

    info!(
        "Initializing in-memory cache (max entries: {})",
        config.max_entries
    );
    Arc::new(InMemoryCache::new(config))
}

/// Create a [`CacheStore`] over the configured backend
pub async fn create_cache_store(config: &CacheConfig) -> CacheStore {
    CacheStore::new(create_backend(config).await)
}
