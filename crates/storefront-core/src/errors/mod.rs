// ABOUTME: Unified error handling with standard error codes and HTTP status mapping
// ABOUTME: Defines AppError, ErrorCode, and the JSON error response envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

//! # Unified Error Handling System
//!
//! Domain modules define their own `thiserror` enums (encryption, cache, database,
//! settings format). Everything that crosses a request boundary is converted into
//! [`AppError`], which carries an [`ErrorCode`] and knows its HTTP status.

/// Persistent store error types
pub mod database;

pub use database::DatabaseError;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard error codes used throughout the application
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    /// No authenticated identity on the request
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    /// Identity lacks the required permission
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied = 1004,

    // Validation (3000-3999)
    /// Request input is invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Data has an unexpected shape
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,

    // Resource Management (4000-4999)
    /// Requested resource does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    /// Resource is temporarily unavailable
    #[serde(rename = "RESOURCE_UNAVAILABLE")]
    ResourceUnavailable = 4003,

    // Configuration (6000-6999)
    /// Generic configuration error
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// Required configuration is missing
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,
    /// Configuration is present but invalid
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Unclassified internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Persistent store failure
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// Serialization or deserialization failure
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
    /// Encryption or decryption failure
    #[serde(rename = "ENCRYPTION_ERROR")]
    EncryptionError = 9004,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::InvalidFormat => 400,
            Self::AuthRequired => 401,
            Self::PermissionDenied => 403,
            Self::ResourceNotFound => 404,
            Self::ResourceUnavailable => 503,
            Self::ConfigError
            | Self::ConfigMissing
            | Self::ConfigInvalid
            | Self::InternalError
            | Self::DatabaseError
            | Self::SerializationError
            | Self::EncryptionError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidFormat => "The data format is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceUnavailable => "The resource is temporarily unavailable",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::EncryptionError => "Encryption operation failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, thiserror::Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional request ID for log correlation
    pub request_id: Option<String>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            request_id: None,
            source: None,
        }
    }

    /// Attach a request ID
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Attach a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Permission denied for the named permission
    pub fn permission_denied(permission: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::PermissionDenied,
            format!("Missing permission '{}'", permission.into()),
        )
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Invalid data format
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Encryption error
    pub fn encryption(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EncryptionError, message)
    }

    /// Serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false` for error responses
    pub success: bool,
    /// Error details
    pub error: ErrorResponseDetails,
}

/// Error payload inside [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Request ID, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            success: false,
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                request_id: error.request_id,
            },
        }
    }
}

impl From<DatabaseError> for AppError {
    fn from(error: DatabaseError) -> Self {
        Self::database(error.to_string()).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error.to_string())
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(code = ?self.code, error = %self.message, "Request failed");
        } else {
            tracing::debug!(code = ?self.code, error = %self.message, "Request rejected");
        }
        (status, axum::Json(ErrorResponse::from(self))).into_response()
    }
}
