// ABOUTME: Role-based permission resolution with static role defaults
// ABOUTME: Custom grants replace role defaults entirely, they are never merged
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

//! # Permission Resolution
//!
//! A user carries a [`Role`] and an optional list of explicit permission grants.
//! The effective set is the explicit grants when there are any, otherwise the
//! static default set of the role. The two sources are never combined: an editor
//! with a single custom grant has exactly that grant.

/// Permission change audit records
pub mod audit;

pub use audit::{record_permission_change, PermissionAuditSink, PermissionChangeEvent};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Permission identifiers used by the admin console
pub mod names {
    /// View the admin dashboard
    pub const DASHBOARD_VIEW: &str = "dashboard.view";
    /// View the product catalog
    pub const PRODUCTS_VIEW: &str = "products.view";
    /// Create and edit products
    pub const PRODUCTS_EDIT: &str = "products.edit";
    /// View content pages
    pub const PAGES_VIEW: &str = "pages.view";
    /// Create and edit content pages
    pub const PAGES_EDIT: &str = "pages.edit";
    /// Edit the homepage layout
    pub const HOMEPAGE_EDIT: &str = "homepage.edit";
    /// Edit navigation menus
    pub const MENUS_EDIT: &str = "menus.edit";
    /// Edit product collections
    pub const COLLECTIONS_EDIT: &str = "collections.edit";
    /// View analytics dashboards
    pub const ANALYTICS_VIEW: &str = "analytics.view";
    /// Read store settings
    pub const SETTINGS_VIEW: &str = "settings.view";
    /// Change store settings
    pub const SETTINGS_EDIT: &str = "settings.edit";
    /// View user accounts
    pub const USERS_VIEW: &str = "users.view";
    /// Create, edit, and disable user accounts
    pub const USERS_MANAGE: &str = "users.manage";
    /// Change roles and permission grants
    pub const ROLES_MANAGE: &str = "roles.manage";
}

const VIEWER_DEFAULTS: &[&str] = &[
    names::DASHBOARD_VIEW,
    names::PRODUCTS_VIEW,
    names::PAGES_VIEW,
    names::ANALYTICS_VIEW,
];

const EDITOR_DEFAULTS: &[&str] = &[
    names::DASHBOARD_VIEW,
    names::PRODUCTS_VIEW,
    names::PRODUCTS_EDIT,
    names::PAGES_VIEW,
    names::PAGES_EDIT,
    names::HOMEPAGE_EDIT,
    names::MENUS_EDIT,
    names::COLLECTIONS_EDIT,
    names::ANALYTICS_VIEW,
];

const ADMIN_DEFAULTS: &[&str] = &[
    names::DASHBOARD_VIEW,
    names::PRODUCTS_VIEW,
    names::PRODUCTS_EDIT,
    names::PAGES_VIEW,
    names::PAGES_EDIT,
    names::HOMEPAGE_EDIT,
    names::MENUS_EDIT,
    names::COLLECTIONS_EDIT,
    names::ANALYTICS_VIEW,
    names::SETTINGS_VIEW,
    names::SETTINGS_EDIT,
    names::USERS_VIEW,
];

const SUPER_ADMIN_DEFAULTS: &[&str] = &[
    names::DASHBOARD_VIEW,
    names::PRODUCTS_VIEW,
    names::PRODUCTS_EDIT,
    names::PAGES_VIEW,
    names::PAGES_EDIT,
    names::HOMEPAGE_EDIT,
    names::MENUS_EDIT,
    names::COLLECTIONS_EDIT,
    names::ANALYTICS_VIEW,
    names::SETTINGS_VIEW,
    names::SETTINGS_EDIT,
    names::USERS_VIEW,
    names::USERS_MANAGE,
    names::ROLES_MANAGE,
];

/// Admin console roles, ordered from most to least privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full control including role management
    SuperAdmin,
    /// Store administration and settings
    Admin,
    /// Content and catalog editing
    Editor,
    /// Read-only access
    Viewer,
}

impl Role {
    /// All roles, most privileged first
    pub const ALL: [Self; 4] = [Self::SuperAdmin, Self::Admin, Self::Editor, Self::Viewer];

    /// Numeric privilege level (higher is more privileged)
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::SuperAdmin => 100,
            Self::Admin => 75,
            Self::Editor => 50,
            Self::Viewer => 10,
        }
    }

    /// Human-readable label for the admin UI
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Administrator",
            Self::Admin => "Administrator",
            Self::Editor => "Editor",
            Self::Viewer => "Viewer",
        }
    }

    /// Static default permission names for this role
    #[must_use]
    pub const fn default_permission_names(self) -> &'static [&'static str] {
        match self {
            Self::SuperAdmin => SUPER_ADMIN_DEFAULTS,
            Self::Admin => ADMIN_DEFAULTS,
            Self::Editor => EDITOR_DEFAULTS,
            Self::Viewer => VIEWER_DEFAULTS,
        }
    }

    /// Wire representation (`SUPER_ADMIN`, `ADMIN`, ...)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::Editor => "EDITOR",
            Self::Viewer => "VIEWER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUPER_ADMIN" | "SUPERADMIN" => Ok(Self::SuperAdmin),
            "ADMIN" => Ok(Self::Admin),
            "EDITOR" => Ok(Self::Editor),
            "VIEWER" => Ok(Self::Viewer),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// Static default permission set for a role
#[must_use]
pub fn default_permissions(role: Role) -> BTreeSet<String> {
    role.default_permission_names()
        .iter()
        .map(|name| (*name).to_owned())
        .collect()
}

/// Effective permissions: custom grants when non-empty, otherwise the role default.
///
/// Pure function. Custom grants are returned unchanged and are never unioned with
/// the role defaults.
#[must_use]
pub fn effective_permissions(role: Role, custom_permissions: &BTreeSet<String>) -> BTreeSet<String> {
    if custom_permissions.is_empty() {
        default_permissions(role)
    } else {
        custom_permissions.clone()
    }
}

/// Where an effective permission set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionSource {
    /// Explicit per-user grants
    Custom,
    /// Static defaults of the user's role
    RoleDefault,
}

/// Effective permissions with role metadata, as returned to the admin UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePermissions {
    /// The user's role
    pub role: Role,
    /// Human-readable role label
    pub role_label: String,
    /// Role privilege level
    pub role_level: u8,
    /// Resolved permission names
    pub permissions: BTreeSet<String>,
    /// Whether the set came from custom grants or role defaults
    pub source: PermissionSource,
}

impl EffectivePermissions {
    /// Resolve a user's role and grants into an effective permission summary
    #[must_use]
    pub fn resolve(role: Role, custom_permissions: &BTreeSet<String>) -> Self {
        let source = if custom_permissions.is_empty() {
            PermissionSource::RoleDefault
        } else {
            PermissionSource::Custom
        };

        Self {
            role,
            role_label: role.label().to_owned(),
            role_level: role.level(),
            permissions: effective_permissions(role, custom_permissions),
            source,
        }
    }

    /// Check whether the named permission is granted
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}
