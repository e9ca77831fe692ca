// ABOUTME: Fail-open read-through cache over a pluggable key/value backend
// ABOUTME: Typed Result internals with logging wrappers that never surface cache errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

/// Backend selection from configuration
pub mod factory;
/// In-memory cache implementation
pub mod memory;
/// Redis cache implementation
pub mod redis;

pub use crate::config::cache::CacheConfig;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use storefront_core::constants::cache::{CACHE_OPERATION_RETRIES, CACHE_RETRY_DELAY_MS};
use tracing::{debug, warn};

/// Cache backend failures
///
/// These never escape the fail-open methods of [`CacheStore`]; they are only
/// visible through the `try_*` methods.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// The backend could not be reached or rejected the command
    #[error("Cache backend error: {0}")]
    Backend(String),

    /// A value could not be serialized or a cached payload could not be decoded
    #[error("Cache serialization error: {0}")]
    Serialization(String),

    /// A pattern passed to a scan is not a valid glob
    #[error("Invalid cache pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The rejected pattern
        pattern: String,
        /// Why it was rejected
        reason: String,
    },
}

impl CacheError {
    /// Whether retrying the same call could succeed
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

/// Byte-level cache backend client
///
/// Implementations must be safe for concurrent use; the connection (or store) is
/// shared by every in-flight request. Timeouts belong to the backend client
/// configuration, not to callers.
#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Fetch raw bytes for a key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store raw bytes with a TTL
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// Remove one key, returning the number of keys removed (0 or 1)
    async fn delete(&self, key: &str) -> Result<u64, CacheError>;

    /// Remove several keys in one batch, returning the number removed
    async fn delete_many(&self, keys: &[String]) -> Result<u64, CacheError>;

    /// Enumerate keys matching a glob with incremental, non-blocking iteration
    async fn scan(&self, pattern: &str) -> Result<Vec<String>, CacheError>;

    /// Verify the backend is reachable
    async fn health_check(&self) -> Result<(), CacheError>;
}

/// Read-through cache with bounded retries and fail-open semantics
///
/// Cloning is cheap; all clones share the same backend.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    retries: u32,
    retry_delay: Duration,
}

impl CacheStore {
    /// Wrap a backend with the default retry policy
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            retries: CACHE_OPERATION_RETRIES,
            retry_delay: Duration::from_millis(CACHE_RETRY_DELAY_MS),
        }
    }

    /// Override the retry policy (retries after the first attempt, fixed delay)
    #[must_use]
    pub const fn with_retry_policy(mut self, retries: u32, retry_delay: Duration) -> Self {
        self.retries = retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Name of the underlying backend
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Run a backend call, retrying transient failures a fixed number of times
    async fn with_retry<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T, CacheError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, CacheError>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    debug!(
                        operation,
                        attempt,
                        max_retries = self.retries,
                        error = %e,
                        "Retrying cache operation"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Read and deserialize a cached value
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails after retries or the payload cannot be decoded
    pub async fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let bytes = self.with_retry("get", || self.backend.get(key)).await?;
        bytes
            .map(|bytes| {
                serde_json::from_slice(&bytes).map_err(|e| {
                    CacheError::Serialization(format!("cannot decode cached '{key}': {e}"))
                })
            })
            .transpose()
    }

    /// Serialize and store a value with a TTL
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the backend fails after retries
    pub async fn try_set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| CacheError::Serialization(format!("cannot encode '{key}': {e}")))?;
        self.with_retry("set", || self.backend.set(key, &bytes, ttl))
            .await
    }

    /// Remove one key
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails after retries
    pub async fn try_delete(&self, key: &str) -> Result<u64, CacheError> {
        self.with_retry("delete", || self.backend.delete(key)).await
    }

    /// Scan for keys matching a glob and remove them in one batch
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid or the backend fails after retries
    pub async fn try_delete_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let keys = self.with_retry("scan", || self.backend.scan(pattern)).await?;
        if keys.is_empty() {
            return Ok(0);
        }
        self.with_retry("delete_many", || self.backend.delete_many(&keys))
            .await
    }

    /// Return the cached value or compute, cache, and return a fresh one.
    ///
    /// `compute` runs exactly once on a miss, on a backend error, or when the cached
    /// payload cannot be decoded. A failed populate write is logged and ignored.
    /// Errors from `compute` itself are returned unchanged; cache errors never are.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `compute`
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.try_get::<T>(key).await {
            Ok(Some(value)) => {
                debug!(cache.key = %key, "Cache hit");
                return Ok(value);
            }
            Ok(None) => debug!(cache.key = %key, "Cache miss"),
            Err(e) => warn!(
                cache.key = %key,
                cache.backend = self.backend_name(),
                error = %e,
                "Cache read failed, computing from source"
            ),
        }

        let value = compute().await?;

        if let Err(e) = self.try_set(key, &value, ttl).await {
            warn!(
                cache.key = %key,
                cache.backend = self.backend_name(),
                error = %e,
                "Cache populate failed, returning computed value"
            );
        }

        Ok(value)
    }

    /// Best-effort single-key delete; returns 0 on backend error
    pub async fn delete(&self, key: &str) -> u64 {
        match self.try_delete(key).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(
                    cache.key = %key,
                    cache.backend = self.backend_name(),
                    error = %e,
                    "Cache delete failed"
                );
                0
            }
        }
    }

    /// Best-effort pattern delete; returns 0 when nothing matches or on backend error
    pub async fn delete_pattern(&self, pattern: &str) -> u64 {
        match self.try_delete_pattern(pattern).await {
            Ok(removed) => {
                debug!(cache.pattern = %pattern, removed, "Cache pattern invalidated");
                removed
            }
            Err(e) => {
                warn!(
                    cache.pattern = %pattern,
                    cache.backend = self.backend_name(),
                    error = %e,
                    "Cache pattern delete failed"
                );
                0
            }
        }
    }

    /// Check backend health
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable
    pub async fn health_check(&self) -> Result<(), CacheError> {
        self.backend.health_check().await
    }
}
