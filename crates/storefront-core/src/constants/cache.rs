// ABOUTME: Cache-related constants for TTL, capacity, retries, and key namespaces
// ABOUTME: Supports both in-memory and Redis cache backends with optimal defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

/// Default maximum cache entries for in-memory cache
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// Default cleanup interval in seconds for expired entries
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300; // 5 minutes

/// Longest TTL any cache entry is stored with (one day)
pub const MAX_TTL_SECS: u64 = 86_400;

/// Settings cache TTL (60 seconds) - the upper bound on read staleness
pub const TTL_SETTINGS_SECS: u64 = 60;

/// Retries after the first attempt for every cache backend call
pub const CACHE_OPERATION_RETRIES: u32 = 2;

/// Fixed delay between cache backend retries in milliseconds
pub const CACHE_RETRY_DELAY_MS: u64 = 25;

/// Keys requested per SCAN iteration
pub const SCAN_BATCH_SIZE: usize = 100;

/// Cache key prefix for namespacing in a shared Redis instance
pub const CACHE_KEY_PREFIX: &str = "storefront:cache:";

/// Root namespace for every cached setting entry and bundle
pub const SETTINGS_NAMESPACE: &str = "settings:";

/// Namespace for individual setting entries
pub const SETTINGS_VALUE_NAMESPACE: &str = "settings:value:";

/// Namespace for aggregate setting bundles
pub const SETTINGS_BUNDLE_NAMESPACE: &str = "settings:bundle:";
