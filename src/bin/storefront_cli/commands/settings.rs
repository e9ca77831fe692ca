// ABOUTME: Setting read, write, and cache commands for storefront-cli
// ABOUTME: Writes go through the resolver so cached entries are invalidated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use crate::helpers::display::{display_setting, display_setting_written};
use storefront_settings::settings::{SettingCategory, SettingValue, SettingsResolver};
use storefront_core::errors::{AppError, AppResult};

/// Print one setting
pub async fn get(resolver: &SettingsResolver, key: &str) -> AppResult<()> {
    let value = resolver.get_setting(key).await?;
    display_setting(key, value.as_ref());
    Ok(())
}

/// Write one setting
pub async fn set(
    resolver: &SettingsResolver,
    key: &str,
    raw: &str,
    category: Option<SettingCategory>,
    force_string: bool,
) -> AppResult<()> {
    let value = parse_value(raw, force_string)
        .ok_or_else(|| AppError::invalid_input("Setting value must not be null"))?;
    let category = category.unwrap_or_else(|| SettingCategory::infer(key));

    resolver.set_setting(key, value, category).await?;
    display_setting_written(key, category);
    Ok(())
}

/// Drop every cached setting
pub async fn clear_cache(resolver: &SettingsResolver) {
    let removed = resolver.clear_settings_cache().await;
    println!("Cleared {removed} cached settings entries");
}

/// JSON when it parses, otherwise the literal string
fn parse_value(raw: &str, force_string: bool) -> Option<SettingValue> {
    if force_string {
        return Some(SettingValue::Text(raw.to_owned()));
    }
    serde_json::from_str(raw).map_or_else(
        |_| Some(SettingValue::Text(raw.to_owned())),
        SettingValue::from_stored,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("false", false), Some(SettingValue::Bool(false)));
        assert_eq!(
            parse_value("{\"enabled\": true}", false),
            Some(SettingValue::Bool(true))
        );
        assert_eq!(
            parse_value("[1, 2]", false),
            Some(SettingValue::Json(json!([1, 2])))
        );
        assert_eq!(
            parse_value("Acme Outfitters", false),
            Some(SettingValue::Text("Acme Outfitters".to_owned()))
        );
        assert_eq!(
            parse_value("42", true),
            Some(SettingValue::Text("42".to_owned()))
        );
        assert_eq!(parse_value("null", false), None);
    }
}
