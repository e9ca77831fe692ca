// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory stores, caches, ciphers, and instrumented test doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `storefront_settings`

use anyhow::Result;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use storefront_core::errors::DatabaseError;
use storefront_settings::cache::memory::InMemoryCache;
use storefront_settings::cache::{CacheBackend, CacheConfig, CacheError, CacheStore};
use storefront_settings::crypto::SettingsCipher;
use storefront_settings::settings::{
    SettingCategory, SettingRecord, SettingsResolver, SettingsStore, SqliteSettingsStore,
};

static INIT_LOGGER: Once = Once::new();

/// Default TTL used by test resolvers
pub const TEST_TTL: Duration = Duration::from_secs(60);

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fixed-key cipher so envelopes written in one test can be read in the same test
pub fn test_cipher() -> Arc<SettingsCipher> {
    Arc::new(SettingsCipher::from_key([7u8; 32]))
}

/// In-memory cache without the background cleanup task
pub fn memory_backend() -> Arc<InMemoryCache> {
    Arc::new(InMemoryCache::new(&CacheConfig {
        enable_background_cleanup: false,
        ..CacheConfig::default()
    }))
}

/// Cache store over a fresh in-memory backend
pub fn memory_cache() -> CacheStore {
    CacheStore::new(memory_backend())
}

/// Fresh migrated in-memory `SQLite` store
pub async fn memory_store() -> Result<Arc<SqliteSettingsStore>> {
    init_test_logging();
    Ok(Arc::new(SqliteSettingsStore::connect("sqlite::memory:").await?))
}

/// Resolver over an instrumented in-memory store and an in-memory cache
pub async fn create_test_resolver() -> Result<(SettingsResolver, Arc<CountingStore>)> {
    let store = Arc::new(CountingStore::new(memory_store().await?));
    let resolver = SettingsResolver::new(store.clone(), memory_cache(), test_cipher(), TEST_TTL);
    Ok((resolver, store))
}

/// Resolver with an explicit cache, for tests that inspect or break the cache
pub async fn create_test_resolver_with_cache(
    cache: CacheStore,
) -> Result<(SettingsResolver, Arc<CountingStore>)> {
    let store = Arc::new(CountingStore::new(memory_store().await?));
    let resolver = SettingsResolver::new(store.clone(), cache, test_cipher(), TEST_TTL);
    Ok((resolver, store))
}

/// Settings store wrapper that counts reads and can be told to reject writes
pub struct CountingStore {
    inner: Arc<SqliteSettingsStore>,
    finds: AtomicUsize,
    prefix_scans: AtomicUsize,
    fail_writes: AtomicBool,
    write_after_scan: Mutex<Option<(String, Value)>>,
}

impl CountingStore {
    pub fn new(inner: Arc<SqliteSettingsStore>) -> Self {
        Self {
            inner,
            finds: AtomicUsize::new(0),
            prefix_scans: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
            write_after_scan: Mutex::new(None),
        }
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn prefix_scans(&self) -> usize {
        self.prefix_scans.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Write directly, bypassing the resolver and its cache invalidation
    pub async fn seed(&self, key: &str, value: Value) {
        self.inner
            .upsert(key, &value, SettingCategory::infer(key))
            .await
            .unwrap();
    }

    /// Apply one write right after the next prefix scan returns, as a concurrent
    /// writer would between a listing and the rewrite that follows it
    pub fn write_after_next_scan(&self, key: &str, value: Value) {
        *self.write_after_scan.lock().unwrap() = Some((key.to_owned(), value));
    }

    /// Stored value exactly as persisted
    pub async fn raw(&self, key: &str) -> Option<Value> {
        self.inner.find(key).await.unwrap().map(|record| record.value)
    }
}

#[async_trait::async_trait]
impl SettingsStore for CountingStore {
    async fn find(&self, key: &str) -> Result<Option<SettingRecord>, DatabaseError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find(key).await
    }

    async fn upsert(
        &self,
        key: &str,
        value: &Value,
        category: SettingCategory,
    ) -> Result<(), DatabaseError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DatabaseError::QueryError {
                context: "database is locked".to_owned(),
            });
        }
        self.inner.upsert(key, value, category).await
    }

    async fn find_many_by_key_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<SettingRecord>, DatabaseError> {
        self.prefix_scans.fetch_add(1, Ordering::SeqCst);
        let records = self.inner.find_many_by_key_prefix(prefix).await?;

        let pending = self.write_after_scan.lock().unwrap().take();
        if let Some((key, value)) = pending {
            self.inner
                .upsert(&key, &value, SettingCategory::infer(&key))
                .await?;
        }
        Ok(records)
    }
}

/// Cache backend that is always unreachable
#[derive(Default)]
pub struct FailingBackend {
    calls: AtomicUsize,
}

impl FailingBackend {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, CacheError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Backend("connection refused".to_owned()))
    }
}

#[async_trait::async_trait]
impl CacheBackend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.fail()
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<(), CacheError> {
        self.fail()
    }

    async fn delete(&self, _key: &str) -> Result<u64, CacheError> {
        self.fail()
    }

    async fn delete_many(&self, _keys: &[String]) -> Result<u64, CacheError> {
        self.fail()
    }

    async fn scan(&self, _pattern: &str) -> Result<Vec<String>, CacheError> {
        self.fail()
    }

    async fn health_check(&self) -> Result<(), CacheError> {
        self.fail()
    }
}

/// Cache store over a [`FailingBackend`] with no retry delay
pub fn failing_cache() -> (Arc<FailingBackend>, CacheStore) {
    let backend = Arc::new(FailingBackend::default());
    let store = CacheStore::new(backend.clone()).with_retry_policy(2, Duration::ZERO);
    (backend, store)
}
