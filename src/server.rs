// ABOUTME: Service wiring from configuration: store, cache, cipher, resolver, and HTTP server
// ABOUTME: Constructs every shared collaborator once at startup and injects it downward
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use crate::cache::factory::create_cache_store;
use crate::config::ServerConfig;
use crate::crypto::SettingsCipher;
use crate::routes::{self, ServerResources};
use crate::settings::{SettingsResolver, SqliteSettingsStore};
use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use storefront_core::errors::AppResult;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Build the settings resolver described by `config`
///
/// A missing or malformed encryption key is fatal; an unreachable cache is not.
///
/// # Errors
///
/// Returns an error if the encryption key is unusable or the database cannot be
/// opened or migrated
pub async fn build_resolver(config: &ServerConfig) -> AppResult<SettingsResolver> {
    let cipher = Arc::new(SettingsCipher::from_env()?);
    let store = Arc::new(SqliteSettingsStore::connect(&config.database_url).await?);
    let cache = create_cache_store(&config.cache).await;

    info!(
        database = %config.database_url,
        cache.backend = cache.backend_name(),
        cache.ttl_secs = config.settings.cache_ttl_secs,
        "Settings resolver ready"
    );

    Ok(SettingsResolver::new(
        store,
        cache,
        cipher,
        config.settings.cache_ttl(),
    ))
}

/// Serve the HTTP API until Ctrl-C
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails
pub async fn serve(config: &ServerConfig, resolver: SettingsResolver) -> Result<()> {
    let app = routes::router(Arc::new(ServerResources::new(resolver)));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow!("failed to bind {addr}: {e}"))?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!("HTTP server failed: {e}"))?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
