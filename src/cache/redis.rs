// ABOUTME: Redis cache backend with managed reconnection and TTL support
// ABOUTME: Provides distributed caching for multi-instance storefront deployments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use super::{CacheBackend, CacheError};
use crate::config::cache::RedisConnectionConfig;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use std::time::Duration;
use storefront_core::constants::cache::{CACHE_KEY_PREFIX, MAX_TTL_SECS, SCAN_BATCH_SIZE};
use tracing::{error, info, warn};

/// Redis cache backend
///
/// Uses Redis `ConnectionManager` for automatic reconnection; the manager is cheap
/// to clone and safe to share across tasks. Connection and response timeouts come
/// from [`RedisConnectionConfig`]. All keys are prefixed with `CACHE_KEY_PREFIX`
/// for namespace isolation in a shared Redis instance.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or no connection can be established
    /// after the configured number of startup retries
    pub async fn connect(
        redis_url: &str,
        conn_config: &RedisConnectionConfig,
    ) -> Result<Self, CacheError> {
        info!(
            "Connecting to Redis (timeout={}s, response_timeout={}s, retries={})",
            conn_config.connection_timeout_secs,
            conn_config.response_timeout_secs,
            conn_config.initial_connection_retries
        );

        let client = redis::Client::open(redis_url)
            .map_err(|e| CacheError::Backend(format!("Failed to create Redis client: {e}")))?;

        let manager = Self::connect_with_retry(&client, conn_config).await?;

        info!("Successfully connected to Redis");

        Ok(Self { manager })
    }

    /// Connect to Redis with exponential backoff retry on failure
    async fn connect_with_retry(
        client: &redis::Client,
        conn_config: &RedisConnectionConfig,
    ) -> Result<ConnectionManager, CacheError> {
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(Duration::from_secs(conn_config.connection_timeout_secs))
            .set_response_timeout(Duration::from_secs(conn_config.response_timeout_secs))
            .set_number_of_retries(conn_config.reconnection_retries)
            .set_exponent_base(conn_config.retry_exponent_base)
            .set_max_delay(conn_config.max_retry_delay_ms);

        let max_retries = conn_config.initial_connection_retries;
        let max_delay_ms = conn_config.max_retry_delay_ms;
        let mut delay_ms = conn_config.initial_retry_delay_ms;
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match ConnectionManager::new_with_config(client.clone(), manager_config.clone()).await
            {
                Ok(manager) => {
                    if attempt > 0 {
                        info!("Redis connection established after {} retries", attempt);
                    }
                    return Ok(manager);
                }
                Err(e) => {
                    if attempt < max_retries {
                        warn!(
                            "Redis connection attempt {}/{} failed, retrying in {}ms: {}",
                            attempt + 1,
                            max_retries + 1,
                            delay_ms,
                            e
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        delay_ms = (delay_ms * 2).min(max_delay_ms);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(CacheError::Backend(format!(
            "Failed to connect to Redis after {} attempts: {}",
            max_retries + 1,
            last_error.map_or_else(|| "unknown error".to_owned(), |e| e.to_string())
        )))
    }

    /// Build full Redis key with namespace prefix
    fn build_key(key: &str) -> String {
        format!("{CACHE_KEY_PREFIX}{key}")
    }

    /// Strip the namespace prefix from a key returned by SCAN
    fn strip_prefix(redis_key: &str) -> &str {
        redis_key
            .strip_prefix(CACHE_KEY_PREFIX)
            .unwrap_or(redis_key)
    }

    fn command_error(command: &'static str, e: &redis::RedisError) -> CacheError {
        error!("Redis {} operation failed: {}", command, e);
        CacheError::Backend(format!("Redis {command} failed: {e}"))
    }
}

#[async_trait::async_trait]
impl CacheBackend for RedisCache {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.manager.clone();
        conn.get(Self::build_key(key))
            .await
            .map_err(|e| Self::command_error("GET", &e))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        // SETEX rejects a zero expiry
        let ttl_secs = ttl.as_secs().clamp(1, MAX_TTL_SECS);

        conn.set_ex::<_, _, ()>(Self::build_key(key), value, ttl_secs)
            .await
            .map_err(|e| Self::command_error("SETEX", &e))
    }

    async fn delete(&self, key: &str) -> Result<u64, CacheError> {
        let mut conn = self.manager.clone();
        conn.del(Self::build_key(key))
            .await
            .map_err(|e| Self::command_error("DEL", &e))
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64, CacheError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let redis_keys: Vec<String> = keys.iter().map(|key| Self::build_key(key)).collect();
        let mut conn = self.manager.clone();
        conn.del(&redis_keys)
            .await
            .map_err(|e| Self::command_error("DEL", &e))
    }

    async fn scan(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        // Glob and Redis MATCH use the same wildcard syntax
        let redis_pattern = Self::build_key(pattern);
        let mut conn = self.manager.clone();
        let mut keys = Vec::new();

        // Cursor-based SCAN; KEYS would block the server on large keyspaces
        let mut cursor = 0u64;
        loop {
            let (next_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&redis_pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH_SIZE)
                .query_async(&mut conn)
                .await
                .map_err(|e| Self::command_error("SCAN", &e))?;

            keys.extend(batch.iter().map(|key| Self::strip_prefix(key).to_owned()));

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        // SCAN may return a key more than once
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }

    async fn health_check(&self) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();

        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::command_error("PING", &e))?;

        if response == "PONG" {
            Ok(())
        } else {
            Err(CacheError::Backend(format!(
                "unexpected PING response '{response}'"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_prefixing_round_trips() {
        let redis_key = RedisCache::build_key("settings:site_name");
        assert_eq!(redis_key, "storefront:cache:settings:site_name");
        assert_eq!(RedisCache::strip_prefix(&redis_key), "settings:site_name");
    }
}
