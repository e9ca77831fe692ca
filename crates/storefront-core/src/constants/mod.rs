// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for cache, Redis, crypto, and settings domains
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Cache-related constants (TTL, sizes, key namespaces)
pub mod cache;
/// Encryption key and envelope constants
pub mod crypto;
/// Redis connection defaults
pub mod redis;
/// Settings keys, prefixes, and sensitive-field fragments
pub mod settings;

/// Service identification for structured logging
pub mod service_names {
    /// Service name reported in startup logs
    pub const STOREFRONT_SETTINGS: &str = "storefront-settings";
}

/// HTTP endpoints exposed by the settings boundary
pub mod endpoints {
    /// Product card settings bundle
    pub const PRODUCT_CARD_SETTINGS: &str = "/api/settings/product-card";
    /// Single setting write
    pub const SETTING_BY_KEY: &str = "/api/settings/:key";
    /// Settings cache clear
    pub const SETTINGS_CACHE_CLEAR: &str = "/api/settings/cache/clear";
    /// Effective permissions of the caller
    pub const PERMISSIONS_ME: &str = "/api/permissions/me";
    /// Health check
    pub const HEALTH_CHECK: &str = "/health";
}
