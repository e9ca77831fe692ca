// ABOUTME: Redis connection defaults for timeouts, reconnection, and startup retries
// ABOUTME: Values are overridable through REDIS_* environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

/// Connection timeout in seconds
pub const CONNECTION_TIMEOUT_SECS: u64 = 5;

/// Per-command response timeout in seconds
pub const RESPONSE_TIMEOUT_SECS: u64 = 3;

/// Reconnection attempts after a dropped connection
pub const RECONNECTION_RETRIES: usize = 3;

/// Exponential backoff base for reconnection delays
pub const RETRY_EXPONENT_BASE: u64 = 2;

/// Maximum reconnection delay in milliseconds
pub const MAX_RETRY_DELAY_MS: u64 = 2_000;

/// Attempts to establish the initial connection at startup
pub const INITIAL_CONNECTION_RETRIES: u32 = 3;

/// First delay between startup connection attempts in milliseconds
pub const INITIAL_RETRY_DELAY_MS: u64 = 500;
