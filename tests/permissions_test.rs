// ABOUTME: Integration tests for role defaults and custom permission grants
// ABOUTME: Verifies replace-not-merge resolution and the permission audit trail
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::collections::BTreeSet;
use std::sync::Mutex;
use storefront_core::permissions::{
    default_permissions, effective_permissions, names, record_permission_change,
    EffectivePermissions, PermissionAuditSink, PermissionChangeEvent, PermissionSource, Role,
};
use storefront_settings::routes::AuthenticatedUser;
use uuid::Uuid;

fn grants(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

#[test]
fn test_viewer_with_homepage_grant_has_only_that_grant() {
    let custom = grants(&[names::HOMEPAGE_EDIT]);

    let resolved = effective_permissions(Role::Viewer, &custom);

    assert_eq!(resolved, custom);
    assert!(!resolved.contains(names::DASHBOARD_VIEW));
}

#[test]
fn test_admin_with_custom_grants_loses_role_defaults() {
    let user = AuthenticatedUser {
        user_id: Uuid::new_v4(),
        role: Role::Admin,
        permissions: grants(&[names::PAGES_EDIT]),
    };

    assert!(user.require(names::PAGES_EDIT).is_ok());
    assert!(user.require(names::SETTINGS_EDIT).is_err());
    assert_eq!(user.effective().source, PermissionSource::Custom);
}

#[test]
fn test_only_admins_edit_settings_by_default() {
    for role in Role::ALL {
        let allowed = default_permissions(role).contains(names::SETTINGS_EDIT);
        assert_eq!(allowed, role.level() >= Role::Admin.level(), "{role}");
    }
    assert!(default_permissions(Role::SuperAdmin).contains(names::ROLES_MANAGE));
    assert!(!default_permissions(Role::Admin).contains(names::ROLES_MANAGE));
}

#[test]
fn test_effective_permissions_wire_format() {
    let resolved = EffectivePermissions::resolve(Role::Editor, &BTreeSet::new());
    let json = serde_json::to_value(&resolved).unwrap();

    assert_eq!(json["role"], "EDITOR");
    assert_eq!(json["roleLabel"], "Editor");
    assert_eq!(json["source"], "role_default");
    assert!(json["permissions"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!(names::MENUS_EDIT)));
}

#[test]
fn test_role_parsing_is_lenient() {
    assert_eq!("super_admin".parse::<Role>(), Ok(Role::SuperAdmin));
    assert_eq!(" editor ".parse::<Role>(), Ok(Role::Editor));
}

#[derive(Default)]
struct MemorySink(Mutex<Vec<PermissionChangeEvent>>);

#[async_trait::async_trait]
impl PermissionAuditSink for MemorySink {
    async fn record(
        &self,
        event: &PermissionChangeEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.0.lock().unwrap().push(event.clone());
        Ok(())
    }
}

#[tokio::test]
async fn test_grant_change_is_audited() {
    let sink = MemorySink::default();
    let actor = Uuid::new_v4();
    let target = Uuid::new_v4();
    let event = PermissionChangeEvent::permissions_changed(
        actor,
        target,
        BTreeSet::new(),
        grants(&[names::HOMEPAGE_EDIT]),
    );

    assert!(record_permission_change(&sink, &event).await);

    let stored = sink.0.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].actor_id, actor);
    assert_eq!(stored[0].target_id, target);
}
