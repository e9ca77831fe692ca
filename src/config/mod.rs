// ABOUTME: Configuration management module for environment-driven settings
// ABOUTME: Server, database, cache, and settings-resolver configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors
//! Configuration module
//!
//! Configuration is read from environment variables only:
//!
//! - **Environment**: Server configuration (`ServerConfig`) assembled at startup
//! - **Cache**: Cache backend selection and Redis connection tuning

/// Cache backend and Redis connection configuration
pub mod cache;
/// Environment and server configuration
pub mod environment;

pub use cache::{CacheConfig, RedisConnectionConfig};
pub use environment::{ServerConfig, SettingsConfig};
