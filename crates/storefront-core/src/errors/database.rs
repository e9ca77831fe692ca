// ABOUTME: Structured error types for persistent settings store operations
// ABOUTME: These are the only errors the settings layer always surfaces to callers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

/// Persistent store failures
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Could not open or reach the database
    #[error("Database connection failed: {context}")]
    ConnectionError {
        /// What was being attempted
        context: String,
    },

    /// A query failed to execute
    #[error("Database query failed: {context}")]
    QueryError {
        /// What was being attempted
        context: String,
    },

    /// Schema migration failed
    #[error("Database migration failed: {context}")]
    MigrationError {
        /// What was being attempted
        context: String,
    },

    /// A stored row could not be decoded into its domain type
    #[error("Invalid stored data in {field}: {reason}")]
    InvalidData {
        /// Column or field name
        field: &'static str,
        /// Why the data is invalid
        reason: String,
    },
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::ConnectionError {
                    context: error.to_string(),
                }
            }
            other => Self::QueryError {
                context: other.to_string(),
            },
        }
    }
}
