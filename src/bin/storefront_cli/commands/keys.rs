// ABOUTME: Encryption key generation command for storefront-cli
// ABOUTME: Prints a fresh base64 key for STOREFRONT_ENCRYPTION_KEY
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use storefront_core::constants::crypto::ENCRYPTION_KEY_ENV;
use storefront_settings::crypto::SettingsCipher;

/// Print a new random key
pub fn generate() {
    let key = SettingsCipher::generate_key();
    println!("{key}");
    eprintln!("Set it with: export {ENCRYPTION_KEY_ENV}=\"{key}\"");
    eprintln!("Changing the key makes previously encrypted settings unreadable.");
}
