// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::inputs::{FieldKind, Validator};
use pinokio_core::test_support::AppProfileBuilder;
use pinokio_core::{Deps, FakeClock, InstallerKind, PlatformFeatures};
use pinokio_platform::PathMap;
use std::sync::Arc;

fn env_manager(base: &std::path::Path) -> Arc<EnvManager> {
    let platform = pinokio_core::Platform {
        kind: pinokio_core::PlatformKind::Unknown,
        base_path: base.to_path_buf(),
        caps: pinokio_core::PlatformCaps { max_mem_gb: 8.0, max_disk_gb: 100.0, max_cpu: 4.0, max_gpu: 0, session_ttl_s: 3600, idle_ttl_s: 600 },
        features: PlatformFeatures::empty(),
        confidence: 1.0,
        detection_evidence: vec![],
    };
    Arc::new(EnvManager::new(Arc::new(PathMap::new(&platform))))
}

fn bare_request(app_id: &str, app_root: &std::path::Path, profile: pinokio_core::AppProfile) -> InstallRequest {
    InstallRequest {
        app_id: AppId::new(app_id),
        app_root: app_root.to_path_buf(),
        category_hint: AppCategory::Unknown,
        form: vec![],
        values: FormValues::new(),
        profile: Some(profile),
    }
}

#[tokio::test]
async fn an_install_with_no_deps_completes_and_persists_installed_state() {
    let state_dir = tempfile::tempdir().expect("tempdir");
    let base_dir = tempfile::tempdir().expect("tempdir");
    let app_root = tempfile::tempdir().expect("tempdir");
    let engine = InstallEngine::new(state_dir.path(), env_manager(base_dir.path()), FakeClock::default());

    let profile = AppProfileBuilder::new("app-a").installer_kind(InstallerKind::Requirements).build();
    let request = bare_request("app-a", app_root.path(), profile);
    let result = engine.install(request).await.expect("install");
    assert_eq!(result.hash, "deadbeef");

    let record = engine.store().load(&AppId::new("app-a")).await.expect("load");
    assert_eq!(record.status, AppState::Installed);
    assert_eq!(record.profile_hash, Some("deadbeef".to_string()));
}

#[tokio::test]
async fn critical_dependency_conflicts_fail_the_install() {
    let state_dir = tempfile::tempdir().expect("tempdir");
    let base_dir = tempfile::tempdir().expect("tempdir");
    let app_root = tempfile::tempdir().expect("tempdir");
    let engine = InstallEngine::new(state_dir.path(), env_manager(base_dir.path()), FakeClock::default());

    let deps = Deps { pip: vec!["python".to_string()], conda: vec!["python".to_string()], ..Default::default() };
    let profile = AppProfileBuilder::new("app-b").installer_kind(InstallerKind::Requirements).deps(deps).build();
    let request = bare_request("app-b", app_root.path(), profile);
    let err = engine.install(request).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::DependencyConflict);

    let record = engine.store().load(&AppId::new("app-b")).await.expect("load");
    assert_eq!(record.status, AppState::Failed);
    assert!(record.failure.is_some());
}

#[tokio::test]
async fn invalid_form_input_aborts_before_installing() {
    let state_dir = tempfile::tempdir().expect("tempdir");
    let base_dir = tempfile::tempdir().expect("tempdir");
    let app_root = tempfile::tempdir().expect("tempdir");
    let engine = InstallEngine::new(state_dir.path(), env_manager(base_dir.path()), FakeClock::default());

    let profile = AppProfileBuilder::new("app-c").installer_kind(InstallerKind::Requirements).build();
    let mut request = bare_request("app-c", app_root.path(), profile);
    request.form = vec![FieldSpec {
        field_id: "token".to_string(),
        kind: FieldKind::Text,
        validators: vec![Validator::Required],
        default: None,
        depends_on: vec![],
    }];
    let err = engine.install(request).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    let record = engine.store().load(&AppId::new("app-c")).await.expect("load");
    assert_eq!(record.status, AppState::Analyzing, "should not progress past analyzing on invalid input");
}

#[tokio::test]
async fn a_second_install_for_the_same_app_is_rejected_while_one_is_in_flight() {
    let state_dir = tempfile::tempdir().expect("tempdir");
    let base_dir = tempfile::tempdir().expect("tempdir");
    let app_root = tempfile::tempdir().expect("tempdir");
    std::fs::write(app_root.path().join("install.sh"), "#!/bin/sh\nsleep 0.3\n").expect("write script");
    let engine = Arc::new(InstallEngine::new(state_dir.path(), env_manager(base_dir.path()), FakeClock::default()));

    let profile = AppProfileBuilder::new("app-d").installer_kind(InstallerKind::Script).build();
    let first_engine = engine.clone();
    let first_root = app_root.path().to_path_buf();
    let first_profile = profile.clone();
    let first = tokio::spawn(async move {
        first_engine.install(bare_request("app-d", &first_root, first_profile)).await
    });

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let second = engine.install(bare_request("app-d", app_root.path(), profile)).await;
    assert_eq!(second.unwrap_err().kind, ErrorKind::Conflict);

    first.await.expect("join").expect("first install should succeed");
}
