// ABOUTME: Environment configuration for the settings service and its collaborators
// ABOUTME: Parses HTTP port, database URL, cache, and settings TTL at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

//! Environment-based configuration management

use super::cache::CacheConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use storefront_core::constants::cache::{MAX_TTL_SECS, TTL_SETTINGS_SECS};
use storefront_core::errors::{AppError, AppResult};
use tracing::info;

/// Default HTTP port for the settings boundary
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default SQLite database location
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/storefront.db";

/// Settings resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// TTL of cached setting values and bundles, in seconds
    pub cache_ttl_secs: u64,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: TTL_SETTINGS_SECS,
        }
    }
}

impl SettingsConfig {
    /// Load settings configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if `SETTINGS_CACHE_TTL_SECS` is set but is not a positive
    /// integer of at most one day
    pub fn from_env() -> AppResult<Self> {
        let cache_ttl_secs = match env::var("SETTINGS_CACHE_TTL_SECS") {
            Ok(raw) => parse_positive_secs("SETTINGS_CACHE_TTL_SECS", &raw)?,
            Err(_) => TTL_SETTINGS_SECS,
        };
        Ok(Self { cache_ttl_secs })
    }

    /// Cache TTL as a `Duration`
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Persistent settings store URL
    pub database_url: String,
    /// Cache backend configuration
    pub cache: CacheConfig,
    /// Settings resolver configuration
    pub settings: SettingsConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// The encryption key is loaded separately by `SettingsCipher::from_env` so
    /// that it never lives in a serializable struct.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but invalid
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let http_port = match env::var("HTTP_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| AppError::config(format!("Invalid HTTP_PORT '{raw}': {e}")))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let config = Self {
            http_port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned()),
            cache: CacheConfig::from_env(),
            settings: SettingsConfig::from_env()?,
        };

        info!(
            http_port = config.http_port,
            redis = config.cache.redis_url.is_some(),
            settings_ttl_secs = config.settings.cache_ttl_secs,
            "Configuration loaded"
        );

        Ok(config)
    }
}

fn parse_positive_secs(name: &str, raw: &str) -> AppResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(secs @ 1..=MAX_TTL_SECS) => Ok(secs),
        _ => Err(AppError::config(format!(
            "{name} must be between 1 and {MAX_TTL_SECS} seconds, got '{raw}'"
        ))),
    }
}
