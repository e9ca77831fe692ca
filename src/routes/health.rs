// ABOUTME: Health check route handler for service monitoring
// ABOUTME: Reports the cache backend in use and whether it is reachable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use super::ServerResources;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;
use storefront_core::constants::endpoints;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(endpoints::HEALTH_CHECK, get(Self::health))
            .with_state(resources)
    }

    /// Service is up; a cache outage degrades but does not fail the check
    async fn health(State(resources): State<Arc<ServerResources>>) -> Json<serde_json::Value> {
        let cache = resources.resolver.cache();
        let cache_status = match cache.health_check().await {
            Ok(()) => "healthy".to_owned(),
            Err(e) => format!("degraded: {e}"),
        };

        Json(serde_json::json!({
            "status": "healthy",
            "cache": {
                "backend": cache.backend_name(),
                "status": cache_status
            },
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }
}
