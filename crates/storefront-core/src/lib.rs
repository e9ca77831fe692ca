// ABOUTME: Core types and constants for the storefront settings layer
// ABOUTME: Foundation crate with error handling, constants, and permission resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

#![deny(unsafe_code)]

//! # Storefront Core
//!
//! Foundation crate providing shared types for the storefront settings layer.
//! It changes infrequently so the main crate benefits from incremental builds.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `DatabaseError`
//! - **constants**: Cache, Redis, crypto and settings constants organized by domain
//! - **permissions**: Role defaults and the effective-permission merge rule

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Role-based permission resolution and permission-change auditing
pub mod permissions;
