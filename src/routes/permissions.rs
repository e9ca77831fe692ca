// ABOUTME: Permission route handlers exposing the caller's effective permission set
// ABOUTME: Resolution is pure and needs no server resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use super::{ApiResponse, AuthenticatedUser};
use axum::{routing::get, Json, Router};
use storefront_core::constants::endpoints;
use storefront_core::permissions::EffectivePermissions;

/// Permission routes container
pub struct PermissionRoutes;

impl PermissionRoutes {
    /// Create all permission routes
    pub fn routes() -> Router {
        Router::new().route(endpoints::PERMISSIONS_ME, get(Self::get_my_permissions))
    }

    /// Effective permissions of the authenticated caller
    async fn get_my_permissions(user: AuthenticatedUser) -> Json<ApiResponse<EffectivePermissions>> {
        Json(ApiResponse::ok(user.effective()))
    }
}
