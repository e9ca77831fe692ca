// ABOUTME: Route module organization for the storefront settings HTTP endpoints
// ABOUTME: Assembles domain routers over shared server resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

//! HTTP routes
//!
//! Each domain module contains only route definitions and thin handlers that
//! delegate to the settings resolver and the permission resolver.

/// Authenticated identity extraction
pub mod auth;
/// Health check routes
pub mod health;
/// Effective permission routes
pub mod permissions;
/// Settings read, write, and cache routes
pub mod settings;

pub use auth::AuthenticatedUser;
pub use health::HealthRoutes;
pub use permissions::PermissionRoutes;
pub use settings::SettingsRoutes;

use crate::settings::SettingsResolver;
use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler
pub struct ServerResources {
    /// Settings read and write path
    pub resolver: SettingsResolver,
}

impl ServerResources {
    /// Bundle resources for the router
    #[must_use]
    pub const fn new(resolver: SettingsResolver) -> Self {
        Self { resolver }
    }
}

/// Success envelope shared by all endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true`; failures render through `AppError`
    pub success: bool,
    /// Endpoint payload
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Build the full application router
///
/// Identity is expected to be installed as an [`AuthenticatedUser`] request
/// extension by middleware layered outside this router.
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(SettingsRoutes::routes(resources.clone()))
        .merge(PermissionRoutes::routes())
        .merge(HealthRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
}
