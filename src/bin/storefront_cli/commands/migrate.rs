// ABOUTME: Data migration commands for storefront-cli
// ABOUTME: Encrypts plaintext secrets and canonicalizes legacy setting values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use crate::helpers::display::display_migration_report;
use storefront_core::errors::AppResult;
use storefront_settings::settings::SettingsResolver;

/// Encrypt sensitive settings stored as plaintext
pub async fn encryption(resolver: &SettingsResolver) -> AppResult<()> {
    let report = resolver.migrate_sensitive_settings().await?;
    display_migration_report("Sensitive settings encryption", &report);
    Ok(())
}

/// Rewrite legacy wrapped values
pub async fn legacy(resolver: &SettingsResolver) -> AppResult<()> {
    let report = resolver.migrate_legacy_formats().await?;
    display_migration_report("Legacy format canonicalization", &report);
    Ok(())
}
