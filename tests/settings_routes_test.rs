// ABOUTME: HTTP-level tests for the settings and permission routes
// ABOUTME: Drives the router with in-memory collaborators and injected identities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::Router;
use http::header::{CACHE_CONTROL, CONTENT_TYPE, EXPIRES, PRAGMA};
use http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use storefront_core::permissions::{names, Role};
use storefront_settings::routes::{self, AuthenticatedUser, ServerResources};
use tower::ServiceExt;
use uuid::Uuid;

async fn test_router() -> Result<(Router, Arc<common::CountingStore>)> {
    let (resolver, store) = common::create_test_resolver().await?;
    Ok((routes::router(Arc::new(ServerResources::new(resolver))), store))
}

fn request(
    method: Method,
    uri: &str,
    user: Option<AuthenticatedUser>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.extension(user);
    }
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn admin() -> AuthenticatedUser {
    AuthenticatedUser::with_role(Uuid::new_v4(), Role::Admin)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_product_card_is_public_and_uncacheable() -> Result<()> {
    let (app, _store) = test_router().await?;

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/settings/product-card", None, None))
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[CACHE_CONTROL], "no-store, no-cache, must-revalidate");
    assert_eq!(headers[PRAGMA], "no-cache");
    assert_eq!(headers[EXPIRES], "0");

    let body: Value = serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await?)?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["showOrigin"], true);
    Ok(())
}

#[tokio::test]
async fn test_update_then_read_reflects_change() -> Result<()> {
    let (app, _store) = test_router().await?;

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            "/api/settings/product_card_showOrigin",
            Some(admin()),
            Some(json!({"value": false})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["key"], "product_card_showOrigin");
    assert_eq!(body["data"]["category"], "product_card");

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/settings/product-card", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["showOrigin"], false);
    assert_eq!(body["data"]["showBrand"], true);
    Ok(())
}

#[tokio::test]
async fn test_explicit_category_is_stored() -> Result<()> {
    let (app, store) = test_router().await?;

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            "/api/settings/store_tagline",
            Some(admin()),
            Some(json!({"value": "Gear for every trail", "category": "ecommerce"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["category"], "ecommerce");
    assert_eq!(store.raw("store_tagline").await, Some(json!("Gear for every trail")));
    Ok(())
}

#[tokio::test]
async fn test_update_without_identity_is_unauthorized() -> Result<()> {
    let (app, store) = test_router().await?;

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            "/api/settings/site_name",
            None,
            Some(json!({"value": "Acme"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "AUTH_REQUIRED");
    assert_eq!(store.raw("site_name").await, None);
    Ok(())
}

#[tokio::test]
async fn test_viewer_cannot_update_settings() -> Result<()> {
    let (app, store) = test_router().await?;
    let viewer = AuthenticatedUser::with_role(Uuid::new_v4(), Role::Viewer);

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            "/api/settings/site_name",
            Some(viewer),
            Some(json!({"value": "Acme"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "PERMISSION_DENIED");
    assert_eq!(store.raw("site_name").await, None);
    Ok(())
}

#[tokio::test]
async fn test_custom_grant_allows_editor_update() -> Result<()> {
    let (app, _store) = test_router().await?;
    let editor = AuthenticatedUser {
        user_id: Uuid::new_v4(),
        role: Role::Editor,
        permissions: BTreeSet::from([names::SETTINGS_EDIT.to_owned()]),
    };

    let (status, _body) = send(
        &app,
        request(
            Method::PUT,
            "/api/settings/site_name",
            Some(editor),
            Some(json!({"value": "Acme"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_null_value_is_rejected() -> Result<()> {
    let (app, _store) = test_router().await?;

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            "/api/settings/site_name",
            Some(admin()),
            Some(json!({"value": null})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    Ok(())
}

#[tokio::test]
async fn test_corrupt_flag_surfaces_as_invalid_format() -> Result<()> {
    let (app, store) = test_router().await?;
    store.seed("product_card_showRating", json!([1, 2, 3])).await;

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/settings/product-card", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_FORMAT");
    Ok(())
}

#[tokio::test]
async fn test_cache_clear_requires_settings_edit() -> Result<()> {
    let (app, _store) = test_router().await?;

    // Warm the bundle
    send(&app, request(Method::GET, "/api/settings/product-card", None, None)).await;

    let editor = AuthenticatedUser::with_role(Uuid::new_v4(), Role::Editor);
    let (status, _) = send(
        &app,
        request(Method::POST, "/api/settings/cache/clear", Some(editor), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/settings/cache/clear", Some(admin()), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cleared"], 1);
    Ok(())
}

#[tokio::test]
async fn test_permissions_me_reports_effective_set() -> Result<()> {
    let (app, _store) = test_router().await?;
    let custom = AuthenticatedUser {
        user_id: Uuid::new_v4(),
        role: Role::Viewer,
        permissions: BTreeSet::from([names::HOMEPAGE_EDIT.to_owned()]),
    };

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/permissions/me", Some(custom), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "VIEWER");
    assert_eq!(body["data"]["source"], "custom");
    assert_eq!(body["data"]["permissions"], json!([names::HOMEPAGE_EDIT]));

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/permissions/me", Some(admin()), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], "role_default");
    assert_eq!(body["data"]["roleLevel"], 75);
    Ok(())
}

#[tokio::test]
async fn test_health_reports_cache_backend() -> Result<()> {
    let (app, _store) = test_router().await?;

    let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cache"]["backend"], "memory");
    assert_eq!(body["cache"]["status"], "healthy");
    Ok(())
}
