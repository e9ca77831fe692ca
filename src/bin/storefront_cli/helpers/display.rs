// ABOUTME: Output formatting helpers for storefront-cli
// ABOUTME: Prints settings and migration reports consistently
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use storefront_settings::settings::{MigrationReport, SettingCategory, SettingValue};

/// Print a setting value as JSON, or a notice when it is unset
pub fn display_setting(key: &str, value: Option<&SettingValue>) {
    match value {
        Some(value) => println!("{}", value.to_json()),
        None => eprintln!("Setting '{key}' is not set"),
    }
}

/// Confirm a write
pub fn display_setting_written(key: &str, category: SettingCategory) {
    println!("Updated '{key}' (category: {category})");
}

/// Print a migration summary
pub fn display_migration_report(title: &str, report: &MigrationReport) {
    println!("{title}");
    println!("{}", "=".repeat(title.len()));
    println!("   Scanned:  {}", report.scanned);
    println!("   Migrated: {}", report.migrated);
    println!("   Skipped:  {}", report.skipped);
    for key in &report.migrated_keys {
        println!("   - {key}");
    }
}
