// ABOUTME: Cryptography module for settings values encrypted at rest
// ABOUTME: AES-256-GCM envelopes plus naming-convention sensitive-field classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

//! Cryptographic utilities for sensitive settings

/// Symmetric cipher producing `ivHex:cipherTextHex` envelopes
pub mod cipher;
/// Sensitive setting key classification
pub mod sensitive;

pub use cipher::{looks_like_envelope, EncryptionError, SettingsCipher};
pub use sensitive::is_sensitive_field;
