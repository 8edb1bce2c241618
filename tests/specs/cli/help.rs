// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs.
//!
//! Verify help text and version output for the top-level command and its
//! subject-area subcommand groups.

use crate::prelude::*;

#[test]
fn pinokio_no_args_shows_usage_and_exits_nonzero() {
    cli().fails().stderr_has("Usage:");
}

#[test]
fn pinokio_help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn pinokio_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn apps_help_shows_subcommands() {
    cli()
        .args(&["apps", "--help"])
        .passes()
        .stdout_has("list")
        .stdout_has("install")
        .stdout_has("start")
        .stdout_has("stop");
}

#[test]
fn processes_help_shows_subcommands() {
    cli().args(&["processes", "--help"]).passes().stdout_has("list").stdout_has("restart");
}

#[test]
fn tunnels_help_shows_subcommands() {
    cli().args(&["tunnels", "--help"]).passes().stdout_has("open").stdout_has("close");
}

#[test]
fn daemon_help_shows_subcommands() {
    cli()
        .args(&["daemon", "--help"])
        .passes()
        .stdout_has("start")
        .stdout_has("stop")
        .stdout_has("status")
        .stdout_has("logs");
}

#[test]
fn cache_help_shows_subcommands() {
    cli().args(&["cache", "--help"]).passes().stdout_has("get").stdout_has("put");
}

#[test]
fn recovery_help_shows_subcommands() {
    cli().args(&["recovery", "--help"]).passes().stdout_has("patterns-list").stdout_has("history");
}
