// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pinokio cache` specs: put/get/invalidate round trips and the stats
//! command, against a running daemon.

use crate::prelude::*;

fn start_daemon(project: &Project) {
    project.pinokio().args(&["daemon", "start"]).passes();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.socket_path().exists()), "daemon should come up");
}

#[test]
fn get_on_a_missing_key_reports_a_miss() {
    let project = Project::empty();
    start_daemon(&project);

    project
        .pinokio()
        .args(&["cache", "get", "missing-key", "--kind", "app-metadata"])
        .passes()
        .stdout_has("<miss>");
}

#[test]
fn put_then_get_round_trips_a_json_document() {
    let project = Project::empty();
    start_daemon(&project);

    project
        .pinokio()
        .args(&["cache", "put", "demo-key", "--kind", "app-metadata", "--value", r#"{"hello":"world"}"#])
        .passes()
        .stdout_has("stored");

    let value = project
        .pinokio()
        .args(&["--json", "cache", "get", "demo-key", "--kind", "app-metadata"])
        .passes()
        .stdout_json();
    assert_eq!(value, serde_json::json!({"hello": "world"}));
}

#[test]
fn invalidate_removes_a_put_key() {
    let project = Project::empty();
    start_daemon(&project);

    project
        .pinokio()
        .args(&["cache", "put", "gone-soon", "--kind", "app-metadata", "--value", "true"])
        .passes();
    project.pinokio().args(&["cache", "invalidate", "gone-soon"]).passes().stdout_has("invalidated");

    project
        .pinokio()
        .args(&["cache", "get", "gone-soon", "--kind", "app-metadata"])
        .passes()
        .stdout_has("<miss>");
}

#[test]
fn stats_reports_a_json_document() {
    let project = Project::empty();
    start_daemon(&project);

    let value = project.pinokio().args(&["--json", "cache", "stats"]).passes().stdout_json();
    assert!(value.is_object(), "cache stats should be a json object, got {value:?}");
}

#[test]
fn cleanup_succeeds_on_an_empty_cache() {
    let project = Project::empty();
    start_daemon(&project);

    project.pinokio().args(&["cache", "cleanup"]).passes().stdout_has("cleaned up");
}
