// ABOUTME: Storefront settings domain: typed values, persistence, and cached resolution
// ABOUTME: Ties the settings store, the read-through cache, and field encryption together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

/// One-shot data migrations over the settings table
pub mod migration;
/// Cached, decrypting settings reads and invalidating writes
pub mod resolver;
/// Settings persistence trait and the `SQLite` implementation
pub mod store;
/// Canonical values and legacy format decoding
pub mod value;

pub use migration::MigrationReport;
pub use resolver::{ProductCardSettings, SettingsBundle, SettingsResolver};
pub use store::{SettingRecord, SettingsStore, SqliteSettingsStore};
pub use value::{LegacyShape, SettingValue};

use crate::crypto::EncryptionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use storefront_core::errors::{AppError, DatabaseError};

/// Errors surfaced by settings operations
///
/// Cache failures are absent on purpose: the resolver degrades to the store.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings store failed
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// A sensitive value could not be encrypted
    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    /// A stored value matched neither its canonical type nor any legacy shape
    #[error("Setting '{key}' has unrecognized format: expected {expected}, found {found}")]
    UnrecognizedFormat {
        /// Setting key
        key: String,
        /// Type the caller asked for
        expected: &'static str,
        /// Shape actually stored
        found: &'static str,
    },
}

impl From<SettingsError> for AppError {
    fn from(error: SettingsError) -> Self {
        match error {
            SettingsError::Database(e) => e.into(),
            SettingsError::Encryption(e) => e.into(),
            e @ SettingsError::UnrecognizedFormat { .. } => Self::invalid_format(e.to_string()),
        }
    }
}

/// Grouping used by the admin console to organize settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingCategory {
    /// Site-wide options
    General,
    /// Shop and checkout options
    Ecommerce,
    /// Outbound email configuration
    Email,
    /// Payment provider configuration
    Payment,
    /// Product card display flags
    ProductCard,
    /// Third-party integration credentials
    Integrations,
}

impl SettingCategory {
    /// All categories
    pub const ALL: [Self; 6] = [
        Self::General,
        Self::Ecommerce,
        Self::Email,
        Self::Payment,
        Self::ProductCard,
        Self::Integrations,
    ];

    /// Stored string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Ecommerce => "ecommerce",
            Self::Email => "email",
            Self::Payment => "payment",
            Self::ProductCard => "product_card",
            Self::Integrations => "integrations",
        }
    }

    /// Guess the category from a key's prefix, defaulting to `General`
    #[must_use]
    pub fn infer(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .filter(|category| *category != Self::General)
            .find(|category| {
                key.strip_prefix(category.as_str())
                    .is_some_and(|rest| rest.starts_with('_'))
            })
            .unwrap_or(Self::General)
    }
}

impl fmt::Display for SettingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingCategory {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| DatabaseError::InvalidData {
                field: "category",
                reason: format!("unknown setting category '{s}'"),
            })
    }
}
