// ABOUTME: Authenticated identity carried as a request extension by upstream middleware
// ABOUTME: Extractor rejects requests without identity and checks effective permissions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use axum::extract::FromRequestParts;
use http::request::Parts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use storefront_core::errors::AppError;
use storefront_core::permissions::{EffectivePermissions, Role};
use tracing::warn;
use uuid::Uuid;

/// Identity of the caller, resolved by authentication middleware
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// User ID
    pub user_id: Uuid,
    /// Assigned role
    pub role: Role,
    /// Custom grants; empty means the role defaults apply
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

impl AuthenticatedUser {
    /// Identity with role-default permissions
    #[must_use]
    pub const fn with_role(user_id: Uuid, role: Role) -> Self {
        Self {
            user_id,
            role,
            permissions: BTreeSet::new(),
        }
    }

    /// Resolve the caller's effective permissions
    #[must_use]
    pub fn effective(&self) -> EffectivePermissions {
        EffectivePermissions::resolve(self.role, &self.permissions)
    }

    /// Require a permission in the effective set
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` if the caller lacks `permission`
    pub fn require(&self, permission: &str) -> Result<(), AppError> {
        if self.effective().has_permission(permission) {
            return Ok(());
        }
        warn!(
            user.id = %self.user_id,
            user.role = %self.role,
            permission,
            "Permission denied"
        );
        Err(AppError::permission_denied(permission))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(AppError::auth_required)
    }
}
