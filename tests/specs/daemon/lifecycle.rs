// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle specs (spec §9).
//!
//! Verify `pinokio daemon start/status/stop` and crash-recovery behavior:
//! restarting after a SIGKILL must come up clean rather than refuse to
//! bind a stale socket.

use crate::prelude::*;

#[test]
fn status_reports_not_running_before_start() {
    let project = Project::empty();
    project.pinokio().args(&["daemon", "status"]).passes().stdout_has("not running");
}

#[test]
fn start_then_status_reports_running() {
    let project = Project::empty();
    project.pinokio().args(&["daemon", "start"]).passes().stdout_has("started");

    let running = wait_for(SPEC_WAIT_MAX_MS, || project.socket_path().exists());
    assert!(running, "daemon socket should appear after start\ndaemon log:\n{}", project.daemon_log());

    project.pinokio().args(&["daemon", "status"]).passes().stdout_has("running");
}

#[test]
fn start_writes_pid_file() {
    let project = Project::empty();
    project.pinokio().args(&["daemon", "start"]).passes();

    let has_pid = wait_for(SPEC_WAIT_MAX_MS, || project.pid_path().exists());
    assert!(has_pid, "daemon.pid should exist after start");
}

#[test]
fn stop_then_status_reports_not_running() {
    let project = Project::empty();
    project.pinokio().args(&["daemon", "start"]).passes();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.socket_path().exists()));

    project.pinokio().args(&["daemon", "stop"]).passes();

    let stopped = wait_for(SPEC_WAIT_MAX_MS, || !project.socket_path().exists());
    assert!(stopped, "daemon socket should be removed after stop\ndaemon log:\n{}", project.daemon_log());

    project.pinokio().args(&["daemon", "status"]).passes().stdout_has("not running");
}

#[test]
fn start_is_idempotent_against_an_already_running_daemon() {
    let project = Project::empty();
    project.pinokio().args(&["daemon", "start"]).passes();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.socket_path().exists()));

    // A second `start` should recognize the live socket and not attempt to
    // spawn a competing pinokiod.
    project.pinokio().args(&["daemon", "start"]).passes().stdout_has("already running");
}

#[test]
fn restart_after_crash_rebinds_the_socket() {
    let project = Project::empty();
    project.pinokio().args(&["daemon", "start"]).passes();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.socket_path().exists()));

    assert!(project.daemon_kill(), "should be able to kill the daemon");
    let dead = wait_for(SPEC_WAIT_MAX_MS, || {
        let Some(pid) = std::fs::read_to_string(project.pid_path()).ok().and_then(|s| s.trim().parse::<u32>().ok()) else {
            return true;
        };
        !std::process::Command::new("kill")
            .args(["-0", &pid.to_string()])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    });
    assert!(dead, "daemon process should be gone after SIGKILL");

    // A SIGKILL leaves the stale socket behind; startup must remove it
    // before binding rather than failing with "address in use".
    project.pinokio().args(&["daemon", "start"]).passes();
    let rebound = wait_for(SPEC_WAIT_MAX_MS, || project.socket_path().exists());
    assert!(rebound, "daemon should rebind its socket after a crash\ndaemon log:\n{}", project.daemon_log());

    project.pinokio().args(&["daemon", "status"]).passes().stdout_has("running");
}

#[test]
fn logs_reports_missing_file_before_start() {
    let project = Project::empty();
    project.pinokio().args(&["daemon", "logs"]).passes().stdout_has("no log file");
}

#[test]
fn logs_shows_startup_line_after_start() {
    let project = Project::empty();
    project.pinokio().args(&["daemon", "start"]).passes();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.socket_path().exists()));

    let has_log_line = wait_for(SPEC_WAIT_MAX_MS, || !project.daemon_log().is_empty());
    assert!(has_log_line, "daemon.log should not be empty once the daemon is up");

    project.pinokio().args(&["daemon", "logs"]).passes().stdout_has("starting pinokiod");
}
