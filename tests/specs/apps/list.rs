// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pinokio apps` specs against a running daemon with an empty catalog.

use crate::prelude::*;

fn start_daemon(project: &Project) {
    project.pinokio().args(&["daemon", "start"]).passes();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.socket_path().exists()), "daemon should come up");
}

#[test]
fn apps_list_is_empty_on_a_fresh_base_path() {
    let project = Project::empty();
    start_daemon(&project);

    project.pinokio().args(&["apps", "list"]).passes().stdout_has("no apps installed");
}

#[test]
fn apps_list_json_is_an_empty_array_on_a_fresh_base_path() {
    let project = Project::empty();
    start_daemon(&project);

    let value = project.pinokio().args(&["--json", "apps", "list"]).passes().stdout_json();
    assert_eq!(value, serde_json::json!([]));
}

#[test]
fn apps_state_on_an_unknown_app_reports_absent() {
    // `apps.state` never errors on an app with no state record on disk —
    // it returns the default `Absent` record, per `StateStore::load`.
    let project = Project::empty();
    start_daemon(&project);

    project
        .pinokio()
        .args(&["apps", "state", "no-such-app"])
        .passes()
        .stdout_has("absent");
}

#[test]
fn apps_analyze_on_an_unknown_app_is_not_found() {
    let project = Project::empty();
    start_daemon(&project);

    project
        .pinokio()
        .args(&["apps", "analyze", "no-such-app"])
        .fails()
        .stderr_has("not_found");
}

#[test]
fn processes_list_is_empty_on_a_fresh_control_dir() {
    let project = Project::empty();
    start_daemon(&project);

    project.pinokio().args(&["processes", "list"]).passes().stdout_has("no tracked processes");
}

#[test]
fn tunnels_list_is_empty_on_a_fresh_control_dir() {
    let project = Project::empty();
    start_daemon(&project);

    project.pinokio().args(&["tunnels", "list"]).passes().stdout_has("no tunnels");
}

#[test]
fn alerts_list_is_empty_before_any_perf_samples() {
    let project = Project::empty();
    start_daemon(&project);

    project.pinokio().args(&["alerts", "list"]).passes().stdout_has("no alerts");
}
