// ABOUTME: Main library entry point for the storefront settings service
// ABOUTME: Cached, encrypted-at-rest settings with role-based permission resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

#![deny(unsafe_code)]

//! # Storefront Settings
//!
//! Server-side settings layer for a storefront admin console.
//!
//! ## Features
//!
//! - **Read-through cache**: Redis or in-memory, fail-open with bounded retries
//! - **Encryption at rest**: AES-256-GCM for secrets, chosen by key naming convention
//! - **Legacy value normalization**: older wrapped encodings decode to canonical scalars
//! - **Permissions**: role defaults replaced wholesale by custom grants
//!
//! ## Architecture
//!
//! - **Cache**: `CacheStore` over an injected `CacheBackend`
//! - **Crypto**: `SettingsCipher` and sensitive-key classification
//! - **Settings**: `SettingsResolver` over a `SettingsStore`
//! - **Routes**: axum handlers delegating to the resolver
//!
//! Permission resolution and the shared error types live in `storefront-core`.

/// Cache backends and the fail-open read-through cache
pub mod cache;

/// Environment-driven configuration
pub mod config;

/// Field encryption for sensitive settings
pub mod crypto;

/// Structured logging setup
pub mod logging;

/// HTTP routes
pub mod routes;

/// Service wiring and HTTP server
pub mod server;

/// Settings values, persistence, and resolution
pub mod settings;

pub use storefront_core::errors;
pub use storefront_core::permissions;
