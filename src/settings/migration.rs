// ABOUTME: Idempotent data migrations for encrypting sensitive settings and canonicalizing legacy values
// ABOUTME: Each run reports what it scanned, rewrote, and skipped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use super::resolver::SettingsResolver;
use super::store::SettingRecord;
use super::value::{LegacyShape, SettingValue};
use super::SettingsError;
use crate::crypto::{is_sensitive_field, looks_like_envelope};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Outcome of a settings migration run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Rows examined
    pub scanned: usize,
    /// Rows rewritten
    pub migrated: usize,
    /// Rows that were candidates but already in the target form
    pub skipped: usize,
    /// Keys that were rewritten
    pub migrated_keys: Vec<String>,
}

impl MigrationReport {
    fn record(&mut self, key: String) {
        self.migrated += 1;
        self.migrated_keys.push(key);
    }
}

impl SettingsResolver {
    /// Fetch the current row for a listed key just before rewriting it, so a
    /// write that landed after the listing is migrated instead of overwritten.
    async fn reload(
        &self,
        listed: &SettingRecord,
    ) -> Result<Option<SettingRecord>, SettingsError> {
        let current = self.store().find(&listed.key).await?;
        if current.is_none() {
            debug!(setting.key = %listed.key, "Setting removed during migration");
        }
        Ok(current)
    }

    /// Encrypt every sensitive setting that is still stored as plaintext.
    ///
    /// Values that already look like an encrypted envelope are left alone, so the
    /// migration can be rerun safely. Each row is re-read right before it is
    /// rewritten; only a write racing that final read and upsert can be lost. The
    /// settings cache is cleared afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or a value cannot be encrypted; rows
    /// rewritten before the failure stay migrated
    pub async fn migrate_sensitive_settings(&self) -> Result<MigrationReport, SettingsError> {
        let records = self.store().find_many_by_key_prefix("").await?;
        let mut report = MigrationReport::default();

        for listed in records {
            report.scanned += 1;
            if !is_sensitive_field(&listed.key) {
                continue;
            }
            let Some(record) = self.reload(&listed).await? else {
                report.skipped += 1;
                continue;
            };

            let plaintext = match SettingValue::from_stored(record.value) {
                Some(SettingValue::Text(text)) if looks_like_envelope(&text) => {
                    report.skipped += 1;
                    continue;
                }
                Some(value) => value.to_plaintext(),
                None => {
                    report.skipped += 1;
                    continue;
                }
            };

            let envelope = self.cipher().encrypt(&plaintext)?;
            self.store()
                .upsert(&record.key, &Value::String(envelope), record.category)
                .await?;
            debug!(setting.key = %record.key, "Encrypted plaintext sensitive setting");
            report.record(record.key);
        }

        if report.migrated > 0 {
            self.clear_settings_cache().await;
        }
        info!(
            scanned = report.scanned,
            migrated = report.migrated,
            skipped = report.skipped,
            "Sensitive settings migration complete"
        );
        Ok(report)
    }

    /// Rewrite legacy object-wrapped values (`{"enabled": ..}`, `{"value": ..}`)
    /// into their canonical scalar form.
    ///
    /// Candidate rows are re-read before they are rewritten, as in
    /// [`Self::migrate_sensitive_settings`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails; rows rewritten before the failure
    /// stay migrated
    pub async fn migrate_legacy_formats(&self) -> Result<MigrationReport, SettingsError> {
        let records = self.store().find_many_by_key_prefix("").await?;
        let mut report = MigrationReport::default();

        for listed in records {
            report.scanned += 1;
            if LegacyShape::detect(&listed.value).is_none() {
                continue;
            }
            let Some(record) = self.reload(&listed).await? else {
                report.skipped += 1;
                continue;
            };
            let Some(shape) = LegacyShape::detect(&record.value) else {
                report.skipped += 1;
                continue;
            };
            let Some(canonical) = SettingValue::from_stored(record.value) else {
                report.skipped += 1;
                continue;
            };

            self.store()
                .upsert(&record.key, &canonical.to_json(), record.category)
                .await?;
            debug!(setting.key = %record.key, shape = ?shape, "Canonicalized legacy setting");
            report.record(record.key);
        }

        if report.migrated > 0 {
            self.clear_settings_cache().await;
        }
        info!(
            scanned = report.scanned,
            migrated = report.migrated,
            "Legacy settings format migration complete"
        );
        Ok(report)
    }
}
