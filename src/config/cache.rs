// ABOUTME: Cache configuration types for backend selection and Redis connections
// ABOUTME: Handles Redis URL, in-memory capacity, cleanup cadence, and retry tuning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use storefront_core::constants::{cache, redis};

/// Cache configuration for Redis and in-memory caching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis URL for distributed caching (in-memory backend when absent)
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Maximum number of entries in the in-memory cache
    pub max_entries: usize,
    /// Cleanup interval for expired in-memory entries, in seconds
    pub cleanup_interval_secs: u64,
    /// Run the background cleanup task (disable in tests)
    pub enable_background_cleanup: bool,
    /// Redis connection configuration
    #[serde(default)]
    pub redis_connection: RedisConnectionConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            max_entries: cache::DEFAULT_CACHE_MAX_ENTRIES,
            cleanup_interval_secs: cache::DEFAULT_CLEANUP_INTERVAL_SECS,
            enable_background_cleanup: true,
            redis_connection: RedisConnectionConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Load cache configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(cache::DEFAULT_CACHE_MAX_ENTRIES),
            cleanup_interval_secs: env::var("CACHE_CLEANUP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(cache::DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
            redis_connection: RedisConnectionConfig::from_env(),
        }
    }

    /// Cleanup interval as a `Duration`, never shorter than one second
    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

/// Redis connection and retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConnectionConfig {
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
    /// Response/command timeout in seconds
    pub response_timeout_secs: u64,
    /// Number of reconnection retries after connection drop
    pub reconnection_retries: usize,
    /// Exponential backoff base for retry delays
    pub retry_exponent_base: u64,
    /// Maximum retry delay in milliseconds
    pub max_retry_delay_ms: u64,
    /// Number of retries for initial connection at startup
    pub initial_connection_retries: u32,
    /// Initial retry delay in milliseconds (doubles with exponential backoff)
    pub initial_retry_delay_ms: u64,
}

impl Default for RedisConnectionConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: redis::CONNECTION_TIMEOUT_SECS,
            response_timeout_secs: redis::RESPONSE_TIMEOUT_SECS,
            reconnection_retries: redis::RECONNECTION_RETRIES,
            retry_exponent_base: redis::RETRY_EXPONENT_BASE,
            max_retry_delay_ms: redis::MAX_RETRY_DELAY_MS,
            initial_connection_retries: redis::INITIAL_CONNECTION_RETRIES,
            initial_retry_delay_ms: redis::INITIAL_RETRY_DELAY_MS,
        }
    }
}

impl RedisConnectionConfig {
    /// Load Redis connection configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            connection_timeout_secs: env::var("REDIS_CONNECTION_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis::CONNECTION_TIMEOUT_SECS),
            response_timeout_secs: env::var("REDIS_RESPONSE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis::RESPONSE_TIMEOUT_SECS),
            reconnection_retries: env::var("REDIS_RECONNECTION_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis::RECONNECTION_RETRIES),
            retry_exponent_base: env::var("REDIS_RETRY_EXPONENT_BASE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis::RETRY_EXPONENT_BASE),
            max_retry_delay_ms: env::var("REDIS_MAX_RETRY_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis::MAX_RETRY_DELAY_MS),
            initial_connection_retries: env::var("REDIS_INITIAL_CONNECTION_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis::INITIAL_CONNECTION_RETRIES),
            initial_retry_delay_ms: env::var("REDIS_INITIAL_RETRY_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis::INITIAL_RETRY_DELAY_MS),
        }
    }
}
