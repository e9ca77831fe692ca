// ABOUTME: Persistent settings store abstraction and its SQLite implementation
// ABOUTME: Values are stored as JSON text keyed by setting name with upsert semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use super::SettingCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use storefront_core::errors::DatabaseError;
use tracing::info;

/// A stored setting row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingRecord {
    /// Unique setting key
    pub key: String,
    /// Stored value exactly as persisted (may be a legacy shape or an encrypted envelope)
    pub value: Value,
    /// Admin console grouping
    pub category: SettingCategory,
    /// When the setting was last written
    pub updated_at: DateTime<Utc>,
}

/// Source of truth for settings
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Find a setting by exact key
    async fn find(&self, key: &str) -> Result<Option<SettingRecord>, DatabaseError>;

    /// Insert or replace a setting
    async fn upsert(
        &self,
        key: &str,
        value: &Value,
        category: SettingCategory,
    ) -> Result<(), DatabaseError>;

    /// All settings whose key starts with `prefix`, ordered by key
    async fn find_many_by_key_prefix(&self, prefix: &str)
        -> Result<Vec<SettingRecord>, DatabaseError>;
}

/// `SQLite`-backed settings store
#[derive(Clone)]
pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    /// Open a connection pool and run migrations
    ///
    /// In-memory databases are limited to a single connection, since every
    /// `SQLite` connection to `:memory:` opens a separate database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated
    pub async fn connect(database_url: &str) -> Result<Self, DatabaseError> {
        let in_memory = database_url.contains(":memory:");

        if !in_memory {
            Self::ensure_parent_dir(database_url).await?;
        }

        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if in_memory || database_url.contains("mode=") {
            database_url.to_owned()
        } else {
            format!("{database_url}?mode=rwc")
        };

        let max_connections = if in_memory { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(&connection_options)
            .await
            .map_err(|e| DatabaseError::ConnectionError {
                context: format!("cannot open {database_url}: {e}"),
            })?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// `SQLite` creates the file but not its directory
    async fn ensure_parent_dir(database_url: &str) -> Result<(), DatabaseError> {
        let path = database_url
            .trim_start_matches("sqlite://")
            .trim_start_matches("sqlite:");
        let path = path.split('?').next().unwrap_or(path);

        match Path::new(path).parent() {
            Some(dir) if !dir.as_os_str().is_empty() => tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| DatabaseError::ConnectionError {
                    context: format!("cannot create directory {}: {e}", dir.display()),
                }),
            _ => Ok(()),
        }
    }

    /// Wrap an existing pool without migrating
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the settings table if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the schema statements fail
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT 'general',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::MigrationError {
            context: format!("create settings table: {e}"),
        })?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_settings_category ON settings(category)")
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::MigrationError {
                context: format!("create settings category index: {e}"),
            })?;

        info!("Settings schema ready");
        Ok(())
    }

    fn record_from_row(row: &SqliteRow) -> Result<SettingRecord, DatabaseError> {
        let key: String = row.try_get("key")?;
        let raw_value: String = row.try_get("value")?;
        let category: String = row.try_get("category")?;
        let updated_at: String = row.try_get("updated_at")?;

        // Rows written before values were JSON-encoded hold bare strings
        let value = serde_json::from_str(&raw_value).unwrap_or(Value::String(raw_value));

        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

        Ok(SettingRecord {
            key,
            value,
            category: category.parse()?,
            updated_at,
        })
    }
}

#[async_trait::async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn find(&self, key: &str) -> Result<Option<SettingRecord>, DatabaseError> {
        let row = sqlx::query(
            r"
            SELECT key, value, category, updated_at
            FROM settings
            WHERE key = ?1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn upsert(
        &self,
        key: &str,
        value: &Value,
        category: SettingCategory,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let encoded = serde_json::to_string(value).map_err(|e| DatabaseError::InvalidData {
            field: "value",
            reason: e.to_string(),
        })?;

        sqlx::query(
            r"
            INSERT INTO settings (key, value, category, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT(key) DO UPDATE SET
                value = ?2,
                category = ?3,
                updated_at = ?4
            ",
        )
        .bind(key)
        .bind(&encoded)
        .bind(category.as_str())
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_many_by_key_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<SettingRecord>, DatabaseError> {
        // substr comparison keeps '_' and '%' in keys literal, unlike LIKE
        let rows = sqlx::query(
            r"
            SELECT key, value, category, updated_at
            FROM settings
            WHERE substr(key, 1, length(?1)) = ?1
            ORDER BY key
            ",
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::record_from_row).collect()
    }
}
