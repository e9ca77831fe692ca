// ABOUTME: Constants for settings encryption keys and envelope format
// ABOUTME: AES-256-GCM key and nonce sizes plus the envelope delimiter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

/// Environment variable holding the settings encryption key
pub const ENCRYPTION_KEY_ENV: &str = "STOREFRONT_ENCRYPTION_KEY";

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce (IV) length in bytes
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// Separator between the hex IV and hex ciphertext
pub const ENVELOPE_DELIMITER: char = ':';
