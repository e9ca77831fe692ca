// ABOUTME: Settings route handlers for product card flags, setting writes, and cache clearing
// ABOUTME: Product card responses are marked uncacheable for browsers and proxies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use super::{ApiResponse, AuthenticatedUser, ServerResources};
use crate::settings::{ProductCardSettings, SettingCategory, SettingValue};
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use http::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
use http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storefront_core::constants::endpoints;
use storefront_core::errors::AppError;
use storefront_core::permissions::names;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

/// Body of a setting write
#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    /// New value; any JSON except `null`
    pub value: serde_json::Value,
    /// Category; inferred from the key prefix when omitted
    #[serde(default)]
    pub category: Option<SettingCategory>,
}

/// Result of a setting write
#[derive(Debug, Serialize)]
pub struct UpdateSettingResponse {
    /// Key written
    pub key: String,
    /// Category stored
    pub category: SettingCategory,
}

/// Result of a cache clear
#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    /// Number of cache entries removed
    pub cleared: u64,
}

/// Settings routes container
pub struct SettingsRoutes;

impl SettingsRoutes {
    /// Create all settings routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let no_cache = ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::overriding(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store, no-cache, must-revalidate"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                PRAGMA,
                HeaderValue::from_static("no-cache"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                EXPIRES,
                HeaderValue::from_static("0"),
            ));

        let product_card: Router<Arc<ServerResources>> = Router::new()
            .route(
                endpoints::PRODUCT_CARD_SETTINGS,
                get(Self::get_product_card_settings),
            )
            .layer(no_cache);

        Router::new()
            .merge(product_card)
            .route(endpoints::SETTING_BY_KEY, put(Self::update_setting))
            .route(endpoints::SETTINGS_CACHE_CLEAR, post(Self::clear_cache))
            .with_state(resources)
    }

    /// Public product card display flags
    async fn get_product_card_settings(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Json<ApiResponse<ProductCardSettings>>, AppError> {
        let settings = resources.resolver.get_product_card_settings().await?;
        Ok(Json(ApiResponse::ok(settings)))
    }

    /// Write one setting
    async fn update_setting(
        State(resources): State<Arc<ServerResources>>,
        user: AuthenticatedUser,
        Path(key): Path<String>,
        Json(request): Json<UpdateSettingRequest>,
    ) -> Result<Json<ApiResponse<UpdateSettingResponse>>, AppError> {
        user.require(names::SETTINGS_EDIT)?;

        let key = key.trim().to_owned();
        if key.is_empty() {
            return Err(AppError::invalid_input("Setting key must not be empty"));
        }
        let value = SettingValue::from_stored(request.value)
            .ok_or_else(|| AppError::invalid_input("Setting value must not be null"))?;
        let category = request
            .category
            .unwrap_or_else(|| SettingCategory::infer(&key));

        resources
            .resolver
            .set_setting(&key, value, category)
            .await?;

        info!(user.id = %user.user_id, setting.key = %key, "Setting updated via API");
        Ok(Json(ApiResponse::ok(UpdateSettingResponse { key, category })))
    }

    /// Drop every cached setting
    async fn clear_cache(
        State(resources): State<Arc<ServerResources>>,
        user: AuthenticatedUser,
    ) -> Result<Json<ApiResponse<ClearCacheResponse>>, AppError> {
        user.require(names::SETTINGS_EDIT)?;

        let cleared = resources.resolver.clear_settings_cache().await;
        info!(user.id = %user.user_id, cleared, "Settings cache cleared via API");
        Ok(Json(ApiResponse::ok(ClearCacheResponse { cleared })))
    }
}
