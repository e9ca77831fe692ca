// ABOUTME: Naming-convention classification of sensitive setting keys
// ABOUTME: Pure and total, depends only on the key string
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use storefront_core::constants::settings::SENSITIVE_FIELD_FRAGMENTS;

/// Whether values under this key must be encrypted at rest.
///
/// Matching is case-insensitive and ignores `_` and `-`, so `stripe_api_key`
/// matches the `apikey` fragment.
#[must_use]
pub fn is_sensitive_field(key: &str) -> bool {
    let normalized: String = key
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    SENSITIVE_FIELD_FRAGMENTS
        .iter()
        .any(|fragment| normalized.contains(fragment))
}
