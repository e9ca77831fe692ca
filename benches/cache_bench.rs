// ABOUTME: Criterion benchmarks for the read-through cache and cached settings reads
// ABOUTME: Measures hit/miss latency, pattern invalidation, and product card bundle reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

//! Criterion benchmarks for cache operations.
//!
//! Uses the in-memory backend so the numbers reflect the cache layer itself
//! rather than network round trips.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storefront_settings::cache::memory::InMemoryCache;
use storefront_settings::cache::{CacheConfig, CacheStore};
use storefront_settings::crypto::SettingsCipher;
use storefront_settings::settings::{
    ProductCardSettings, SettingCategory, SettingsResolver, SqliteSettingsStore,
};
use tokio::runtime::Runtime;

const TTL: Duration = Duration::from_secs(3600);

/// Create test cache (no background cleanup for benchmarks)
fn memory_cache() -> CacheStore {
    CacheStore::new(Arc::new(InMemoryCache::new(&CacheConfig {
        max_entries: 10_000,
        enable_background_cleanup: false,
        ..CacheConfig::default()
    })))
}

/// Benchmark `get_or_compute` on warm and cold keys
fn bench_get_or_compute(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("cache_get_or_compute");
    let cache = memory_cache();

    rt.block_on(async {
        cache
            .try_set("settings:bundle:product_card", &ProductCardSettings::default(), TTL)
            .await
            .unwrap();
    });

    group.bench_function("memory_hit", |b| {
        b.iter(|| {
            rt.block_on(async {
                let _: Result<ProductCardSettings, Infallible> = cache
                    .get_or_compute(black_box("settings:bundle:product_card"), TTL, || async {
                        Ok(ProductCardSettings::default())
                    })
                    .await;
            });
        });
    });

    group.bench_function("memory_miss", |b| {
        let mut key_index = 0_usize;
        b.iter(|| {
            let key = format!("settings:miss_{key_index}");
            key_index = key_index.wrapping_add(1);
            rt.block_on(async {
                let _: Result<bool, Infallible> = cache
                    .get_or_compute(black_box(&key), TTL, || async { Ok(true) })
                    .await;
            });
        });
    });

    group.finish();
}

/// Benchmark SCAN plus batched delete over 100 matching keys
fn bench_delete_pattern(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("cache_delete_pattern");
    group.throughput(Throughput::Elements(100));

    group.bench_function("memory_100_entries", |b| {
        b.iter_custom(|iters| {
            let cache = memory_cache();
            let mut elapsed = Duration::ZERO;
            for _ in 0..iters {
                rt.block_on(async {
                    for i in 0..100 {
                        cache.try_set(&format!("settings:key_{i}"), &i, TTL).await.unwrap();
                    }
                    cache.try_set("sessions:other", &0, TTL).await.unwrap();
                });

                let start = Instant::now();
                rt.block_on(async {
                    black_box(cache.delete_pattern("settings:*").await);
                });
                elapsed += start.elapsed();
            }
            elapsed
        });
    });

    group.finish();
}

/// Benchmark the product card bundle through the full resolver
fn bench_product_card_settings(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("product_card_settings");

    let resolver = rt.block_on(async {
        let store = Arc::new(SqliteSettingsStore::connect("sqlite::memory:").await.unwrap());
        let resolver = SettingsResolver::new(
            store,
            memory_cache(),
            Arc::new(SettingsCipher::from_key([7u8; 32])),
            TTL,
        );
        resolver
            .set_setting("product_card_showOrigin", false, SettingCategory::ProductCard)
            .await
            .unwrap();
        resolver
    });

    group.bench_function("cached_bundle", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(resolver.get_product_card_settings().await.unwrap());
            });
        });
    });

    group.bench_function("rebuild_after_clear", |b| {
        b.iter(|| {
            rt.block_on(async {
                resolver.clear_settings_cache().await;
                black_box(resolver.get_product_card_settings().await.unwrap());
            });
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_get_or_compute,
    bench_delete_pattern,
    bench_product_card_settings
);
criterion_main!(benches);
