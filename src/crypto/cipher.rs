// ABOUTME: AES-256-GCM encryption of individual setting values with a fresh IV per call
// ABOUTME: Loads the process-wide key once from the environment and zeroizes it on drop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

//! Settings value cipher
//!
//! Envelopes have the form `hex(iv):hex(ciphertext || tag)`. A new random 96-bit IV
//! is drawn on every call, so encrypting the same value twice yields two different
//! envelopes and an observer of the settings table cannot tell whether a secret
//! changed between writes.

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit};
use base64::{engine::general_purpose, Engine};
use rand::RngCore;
use std::env;
use std::fmt;
use storefront_core::constants::crypto::{
    ENCRYPTION_KEY_ENV, ENVELOPE_DELIMITER, KEY_LEN, NONCE_LEN, TAG_LEN,
};
use storefront_core::errors::{AppError, ErrorCode};
use tracing::info;
use zeroize::Zeroize;

/// Encryption module failures
#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    /// The symmetric key is missing or malformed
    #[error("Encryption configuration error: {0}")]
    Configuration(String),

    /// The value is not a decryptable envelope
    #[error("Invalid encrypted envelope: {0}")]
    InvalidEnvelope(String),

    /// The cipher rejected the plaintext
    #[error("Encryption failed: {0}")]
    Cipher(String),
}

impl From<EncryptionError> for AppError {
    fn from(error: EncryptionError) -> Self {
        let code = match error {
            EncryptionError::Configuration(_) => ErrorCode::ConfigInvalid,
            EncryptionError::InvalidEnvelope(_) => ErrorCode::InvalidFormat,
            EncryptionError::Cipher(_) => ErrorCode::EncryptionError,
        };
        Self::new(code, error.to_string())
    }
}

/// Symmetric cipher for sensitive setting values
pub struct SettingsCipher {
    key: [u8; KEY_LEN],
}

impl SettingsCipher {
    /// Create a cipher from raw key bytes
    #[must_use]
    pub const fn from_key(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Load the key from `STOREFRONT_ENCRYPTION_KEY`
    ///
    /// Called once at startup. There is no development fallback: a missing key
    /// must stop the process from serving sensitive settings.
    ///
    /// # Errors
    ///
    /// Returns `EncryptionError::Configuration` if the variable is unset or malformed
    pub fn from_env() -> Result<Self, EncryptionError> {
        let encoded = env::var(ENCRYPTION_KEY_ENV).map_err(|_| {
            EncryptionError::Configuration(format!("{ENCRYPTION_KEY_ENV} is not set"))
        })?;
        let cipher = Self::from_encoded(&encoded)?;
        info!("Loaded settings encryption key from {}", ENCRYPTION_KEY_ENV);
        Ok(cipher)
    }

    /// Parse a key given as base64 or as 64 hex characters
    ///
    /// # Errors
    ///
    /// Returns `EncryptionError::Configuration` if the encoding is invalid or the
    /// decoded key is not exactly 32 bytes
    pub fn from_encoded(encoded: &str) -> Result<Self, EncryptionError> {
        let trimmed = encoded.trim();
        if trimmed.is_empty() {
            return Err(EncryptionError::Configuration(
                "encryption key is empty".to_owned(),
            ));
        }

        let mut key_bytes = if trimmed.len() == KEY_LEN * 2
            && trimmed.bytes().all(|b| b.is_ascii_hexdigit())
        {
            hex::decode(trimmed).map_err(|e| {
                EncryptionError::Configuration(format!("invalid hex encryption key: {e}"))
            })?
        } else {
            general_purpose::STANDARD.decode(trimmed).map_err(|e| {
                EncryptionError::Configuration(format!("invalid base64 encryption key: {e}"))
            })?
        };

        if key_bytes.len() != KEY_LEN {
            let len = key_bytes.len();
            key_bytes.zeroize();
            return Err(EncryptionError::Configuration(format!(
                "encryption key must be exactly {KEY_LEN} bytes, got {len} bytes"
            )));
        }

        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&key_bytes);
        key_bytes.zeroize();
        Ok(Self { key })
    }

    /// Generate a new random key, base64 encoded, for provisioning
    #[must_use]
    pub fn generate_key() -> String {
        let mut key = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        let encoded = general_purpose::STANDARD.encode(key);
        key.zeroize();
        encoded
    }

    /// Encrypt a value into an `ivHex:cipherTextHex` envelope
    ///
    /// # Errors
    ///
    /// Returns `EncryptionError::Cipher` if the AEAD implementation rejects the input
    pub fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = GenericArray::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| EncryptionError::Cipher(e.to_string()))?;

        Ok(format!(
            "{}{ENVELOPE_DELIMITER}{}",
            hex::encode(nonce_bytes),
            hex::encode(ciphertext)
        ))
    }

    /// Decrypt an envelope produced by [`Self::encrypt`]
    ///
    /// # Errors
    ///
    /// Returns `EncryptionError::InvalidEnvelope` if the envelope is malformed, was
    /// produced under another key, has been tampered with, or is not UTF-8
    pub fn decrypt(&self, envelope: &str) -> Result<String, EncryptionError> {
        let (nonce_bytes, ciphertext) = parse_envelope(envelope)?;
        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));

        let plaintext = cipher
            .decrypt(GenericArray::from_slice(&nonce_bytes), ciphertext.as_slice())
            .map_err(|_| {
                EncryptionError::InvalidEnvelope("authentication failed".to_owned())
            })?;

        String::from_utf8(plaintext).map_err(|_| {
            EncryptionError::InvalidEnvelope("decrypted value is not valid UTF-8".to_owned())
        })
    }
}

impl Drop for SettingsCipher {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl fmt::Debug for SettingsCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsCipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Whether a stored value has the structural shape of an envelope
///
/// Used to tell legacy plaintext apart from ciphertext that fails to decrypt.
#[must_use]
pub fn looks_like_envelope(value: &str) -> bool {
    parse_envelope(value).is_ok()
}

/// Split and hex-decode an envelope into `(iv, ciphertext)`
fn parse_envelope(envelope: &str) -> Result<(Vec<u8>, Vec<u8>), EncryptionError> {
    let (iv_hex, ciphertext_hex) = envelope.split_once(ENVELOPE_DELIMITER).ok_or_else(|| {
        EncryptionError::InvalidEnvelope("missing ':' delimiter".to_owned())
    })?;

    if iv_hex.is_empty() || ciphertext_hex.is_empty() {
        return Err(EncryptionError::InvalidEnvelope(
            "empty envelope segment".to_owned(),
        ));
    }
    if ciphertext_hex.contains(ENVELOPE_DELIMITER) {
        return Err(EncryptionError::InvalidEnvelope(
            "envelope must have exactly two segments".to_owned(),
        ));
    }

    let iv = hex::decode(iv_hex)
        .map_err(|e| EncryptionError::InvalidEnvelope(format!("IV is not hex: {e}")))?;
    let ciphertext = hex::decode(ciphertext_hex)
        .map_err(|e| EncryptionError::InvalidEnvelope(format!("ciphertext is not hex: {e}")))?;

    if iv.len() != NONCE_LEN {
        return Err(EncryptionError::InvalidEnvelope(format!(
            "IV must be {NONCE_LEN} bytes, got {}",
            iv.len()
        )));
    }
    if ciphertext.len() < TAG_LEN {
        return Err(EncryptionError::InvalidEnvelope(
            "ciphertext shorter than authentication tag".to_owned(),
        ));
    }

    Ok((iv, ciphertext))
}
