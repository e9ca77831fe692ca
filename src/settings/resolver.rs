// ABOUTME: Settings resolver with read-through caching, decryption, and write invalidation
// ABOUTME: The single read and write path for storefront settings used by routes and the CLI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use super::store::SettingsStore;
use super::value::SettingValue;
use super::{SettingCategory, SettingsError};
use crate::cache::CacheStore;
use crate::crypto::{is_sensitive_field, looks_like_envelope, SettingsCipher};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use storefront_core::constants::cache::{
    SETTINGS_BUNDLE_NAMESPACE, SETTINGS_NAMESPACE, SETTINGS_VALUE_NAMESPACE,
};
use storefront_core::constants::settings::{
    ECOMMERCE_ENABLED, PRODUCT_CARD_BUNDLE, PRODUCT_CARD_PREFIX, PRODUCT_CARD_SHOW_BRAND,
    PRODUCT_CARD_SHOW_CATEGORY, PRODUCT_CARD_SHOW_ORIGIN, PRODUCT_CARD_SHOW_PRICE,
    PRODUCT_CARD_SHOW_RATING, PRODUCT_CARD_SHOW_STOCK_STATUS,
};
use tracing::{debug, error, info, warn};

/// Display flags for storefront product cards
///
/// Every flag defaults to `true` when its setting has never been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct ProductCardSettings {
    /// Show the product brand
    pub show_brand: bool,
    /// Show the country of origin
    pub show_origin: bool,
    /// Show the product category
    pub show_category: bool,
    /// Show the average rating
    pub show_rating: bool,
    /// Show stock availability
    pub show_stock_status: bool,
    /// Show the price
    pub show_price: bool,
}

impl Default for ProductCardSettings {
    fn default() -> Self {
        Self {
            show_brand: true,
            show_origin: true,
            show_category: true,
            show_rating: true,
            show_stock_status: true,
            show_price: true,
        }
    }
}

impl ProductCardSettings {
    fn flag_mut(&mut self, key: &str) -> Option<&mut bool> {
        match key {
            PRODUCT_CARD_SHOW_BRAND => Some(&mut self.show_brand),
            PRODUCT_CARD_SHOW_ORIGIN => Some(&mut self.show_origin),
            PRODUCT_CARD_SHOW_CATEGORY => Some(&mut self.show_category),
            PRODUCT_CARD_SHOW_RATING => Some(&mut self.show_rating),
            PRODUCT_CARD_SHOW_STOCK_STATUS => Some(&mut self.show_stock_status),
            PRODUCT_CARD_SHOW_PRICE => Some(&mut self.show_price),
            _ => None,
        }
    }
}

/// Grouped settings cached under one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsBundle {
    /// Product card display flags
    ProductCard,
}

impl SettingsBundle {
    /// All bundles
    pub const ALL: [Self; 1] = [Self::ProductCard];

    /// Bundle name within the bundle namespace
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ProductCard => PRODUCT_CARD_BUNDLE,
        }
    }

    /// Key prefix of the settings that make up this bundle
    #[must_use]
    pub const fn key_prefix(self) -> &'static str {
        match self {
            Self::ProductCard => PRODUCT_CARD_PREFIX,
        }
    }

    /// Cache key of the assembled bundle
    #[must_use]
    pub fn cache_key(self) -> String {
        format!("{SETTINGS_BUNDLE_NAMESPACE}{}", self.name())
    }

    /// Whether a write to `key` makes this bundle stale
    #[must_use]
    pub fn owns(self, key: &str) -> bool {
        key.starts_with(self.key_prefix())
    }
}

/// Cache key for a single setting
#[must_use]
pub fn setting_cache_key(key: &str) -> String {
    format!("{SETTINGS_VALUE_NAMESPACE}{key}")
}

/// Cached settings access
///
/// Reads go through the cache and fall back to the store on any cache failure.
/// Writes go to the store first; the cache is only invalidated after the store
/// accepted the write. Cached entries hold decrypted, normalized values.
#[derive(Clone)]
pub struct SettingsResolver {
    store: Arc<dyn SettingsStore>,
    cache: CacheStore,
    cipher: Arc<SettingsCipher>,
    ttl: Duration,
}

impl SettingsResolver {
    /// Create a resolver over a store, a cache, and the field cipher
    #[must_use]
    pub fn new(
        store: Arc<dyn SettingsStore>,
        cache: CacheStore,
        cipher: Arc<SettingsCipher>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            cipher,
            ttl,
        }
    }

    /// The underlying store
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    /// The cache used for reads
    #[must_use]
    pub const fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub(crate) fn cipher(&self) -> &SettingsCipher {
        &self.cipher
    }

    /// Read one setting, decrypted and normalized
    ///
    /// Returns `None` when the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store fails or a stored row is corrupt
    pub async fn get_setting(&self, key: &str) -> Result<Option<SettingValue>, SettingsError> {
        self.cache
            .get_or_compute(&setting_cache_key(key), self.ttl, || self.load_setting(key))
            .await
    }

    async fn load_setting(&self, key: &str) -> Result<Option<SettingValue>, SettingsError> {
        let Some(record) = self.store.find(key).await? else {
            debug!(setting.key = %key, "Setting not found");
            return Ok(None);
        };

        Ok(SettingValue::from_stored(record.value).map(|value| {
            if is_sensitive_field(key) {
                self.reveal(key, value)
            } else {
                value
            }
        }))
    }

    /// Decrypt a sensitive value, passing legacy plaintext through
    fn reveal(&self, key: &str, value: SettingValue) -> SettingValue {
        let SettingValue::Text(stored) = value else {
            return value;
        };

        match self.cipher.decrypt(&stored) {
            Ok(plaintext) => SettingValue::Text(plaintext),
            Err(e) if looks_like_envelope(&stored) => {
                error!(
                    setting.key = %key,
                    error = %e,
                    "Encrypted setting failed to decrypt, returning stored value (possible corruption or key mismatch)"
                );
                SettingValue::Text(stored)
            }
            Err(_) => {
                warn!(
                    setting.key = %key,
                    "Sensitive setting stored as plaintext, run migrate-encryption"
                );
                SettingValue::Text(stored)
            }
        }
    }

    /// Write a setting, encrypting it if the key is sensitive, then invalidate
    /// the setting's cache entry and any bundle that includes it.
    ///
    /// # Errors
    ///
    /// Returns an error if encryption or the store write fails; the cache is not
    /// touched in that case
    pub async fn set_setting(
        &self,
        key: &str,
        value: impl Into<SettingValue> + Send,
        category: SettingCategory,
    ) -> Result<(), SettingsError> {
        let value = value.into();
        let sensitive = is_sensitive_field(key);

        let stored = if sensitive {
            Value::String(self.cipher.encrypt(&value.to_plaintext())?)
        } else {
            value.to_json()
        };

        self.store.upsert(key, &stored, category).await?;
        self.invalidate(key).await;

        info!(
            setting.key = %key,
            setting.category = %category,
            sensitive,
            "Setting updated"
        );
        Ok(())
    }

    /// Drop the cached entry for `key` and every bundle that includes it
    pub(crate) async fn invalidate(&self, key: &str) {
        self.cache.delete(&setting_cache_key(key)).await;
        for bundle in SettingsBundle::ALL {
            if bundle.owns(key) {
                self.cache
                    .delete_pattern(&format!("{}*", bundle.cache_key()))
                    .await;
            }
        }
    }

    /// Drop every cached setting and bundle, returning the number of entries removed
    pub async fn clear_settings_cache(&self) -> u64 {
        let removed = self
            .cache
            .delete_pattern(&format!("{SETTINGS_NAMESPACE}*"))
            .await;
        info!(removed, "Settings cache cleared");
        removed
    }

    /// Product card display flags, cached as one bundle
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or a flag is stored in an
    /// unrecognized format
    pub async fn get_product_card_settings(&self) -> Result<ProductCardSettings, SettingsError> {
        self.cache
            .get_or_compute(
                &SettingsBundle::ProductCard.cache_key(),
                self.ttl,
                || self.load_product_card_settings(),
            )
            .await
    }

    async fn load_product_card_settings(&self) -> Result<ProductCardSettings, SettingsError> {
        let records = self
            .store
            .find_many_by_key_prefix(SettingsBundle::ProductCard.key_prefix())
            .await?;
        let stored: HashMap<String, Value> = records
            .into_iter()
            .map(|record| (record.key, record.value))
            .collect();

        let mut settings = ProductCardSettings::default();
        for (key, raw) in stored {
            let Some(flag) = settings.flag_mut(&key) else {
                continue;
            };
            if let Some(value) = SettingValue::from_stored(raw) {
                *flag = value.as_bool(&key)?;
            }
        }
        Ok(settings)
    }

    /// Read a boolean setting
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the value is not a boolean
    pub async fn get_bool(&self, key: &str) -> Result<Option<bool>, SettingsError> {
        self.get_setting(key)
            .await?
            .map(|value| value.as_bool(key))
            .transpose()
    }

    /// Read a string setting
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the value is not a string
    pub async fn get_string(&self, key: &str) -> Result<Option<String>, SettingsError> {
        self.get_setting(key)
            .await?
            .map(|value| value.as_text(key).map(str::to_owned))
            .transpose()
    }

    /// Read a numeric setting
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the value is not numeric
    pub async fn get_number(&self, key: &str) -> Result<Option<f64>, SettingsError> {
        self.get_setting(key)
            .await?
            .map(|value| value.as_f64(key))
            .transpose()
    }

    /// Whether the shop is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the value is not a boolean
    pub async fn is_ecommerce_enabled(&self) -> Result<bool, SettingsError> {
        // Default to disabled
        Ok(self.get_bool(ECOMMERCE_ENABLED).await?.unwrap_or(false))
    }
}
