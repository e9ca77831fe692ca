// ABOUTME: Audit records for role and permission changes
// ABOUTME: Recording failures are logged and swallowed so they never block the change
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use super::Role;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// What changed on the target user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PermissionChange {
    /// Role reassignment
    Role {
        /// Role before the change
        old: Role,
        /// Role after the change
        new: Role,
    },
    /// Custom grant list replacement
    Permissions {
        /// Grants before the change
        old: BTreeSet<String>,
        /// Grants after the change
        new: BTreeSet<String>,
    },
}

/// A single permission or role change, ready to be persisted by an audit sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionChangeEvent {
    /// Unique event identifier
    pub event_id: Uuid,
    /// User who made the change
    pub actor_id: Uuid,
    /// User whose access changed
    pub target_id: Uuid,
    /// Old and new values
    pub change: PermissionChange,
    /// When the change happened
    pub timestamp: DateTime<Utc>,
}

impl PermissionChangeEvent {
    /// Record a role reassignment
    #[must_use]
    pub fn role_changed(actor_id: Uuid, target_id: Uuid, old: Role, new: Role) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            actor_id,
            target_id,
            change: PermissionChange::Role { old, new },
            timestamp: Utc::now(),
        }
    }

    /// Record a custom grant replacement
    #[must_use]
    pub fn permissions_changed(
        actor_id: Uuid,
        target_id: Uuid,
        old: BTreeSet<String>,
        new: BTreeSet<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            actor_id,
            target_id,
            change: PermissionChange::Permissions { old, new },
            timestamp: Utc::now(),
        }
    }
}

/// Destination for permission audit events (database table, log shipper, ...)
#[async_trait]
pub trait PermissionAuditSink: Send + Sync {
    /// Persist one event
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be stored
    async fn record(
        &self,
        event: &PermissionChangeEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Log the change and hand it to the sink, swallowing sink failures.
///
/// Returns `true` when the sink accepted the event.
pub async fn record_permission_change(
    sink: &dyn PermissionAuditSink,
    event: &PermissionChangeEvent,
) -> bool {
    tracing::info!(
        event_id = %event.event_id,
        actor_id = %event.actor_id,
        target_id = %event.target_id,
        change = ?event.change,
        "Permission change"
    );

    match sink.record(event).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                event_id = %event.event_id,
                error = %e,
                "Failed to record permission audit event"
            );
            false
        }
    }
}
