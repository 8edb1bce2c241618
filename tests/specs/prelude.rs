// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test helpers for behavioral specifications.
//!
//! Provides a high-level DSL for driving the `pinokio` CLI against an
//! isolated control directory and platform base path, grounded on the
//! teacher's own `tests/specs/prelude.rs` `CliBuilder`/`Project`/
//! `RunAssert` shapes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub const SPEC_POLL_INTERVAL_MS: u64 = 20;
pub const SPEC_WAIT_MAX_MS: u64 = 3000;

/// Returns the path to a workspace binary, checking the llvm-cov target
/// directory first (same dual-location resolution the teacher's prelude
/// uses, since test binaries and coverage runs build into different
/// directories).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

fn pinokio_binary() -> PathBuf {
    binary_path("pinokio")
}

pub fn pinokiod_binary() -> PathBuf {
    binary_path("pinokiod")
}

/// Creates a CLI builder for bare `pinokio` invocations, outside the
/// context of any `Project`.
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

/// Fluent builder for one `pinokio` invocation.
pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self { args: Vec::new(), dir: None, envs: Vec::new() }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((key.to_string(), value.as_ref().to_string_lossy().to_string()));
        self
    }

    pub fn command(self) -> Command {
        let mut cmd = Command::new(pinokio_binary());
        cmd.args(&self.args);
        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }
        // Prevent a parent test's control directory from leaking into a
        // child test run via the environment it inherited.
        cmd.env_remove("XDG_STATE_HOME");
        for (key, value) in self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    pub fn passes(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("pinokio should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    pub fn fails(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("pinokio should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run, for chaining assertions.
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).expect("stdout should be valid json")
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(expected), "stdout does not contain '{expected}'\nstdout: {stdout}");
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(!stdout.contains(unexpected), "stdout should not contain '{unexpected}'\nstdout: {stdout}");
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(expected), "stderr does not contain '{expected}'\nstderr: {stderr}");
        self
    }
}

/// Polls `condition` until it returns true or `timeout_ms` elapses.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

/// An isolated control directory (`XDG_STATE_HOME`) and platform base path
/// (`--base-path`) for one test, so parallel specs never share a daemon
/// socket or an app-install tree.
pub struct Project {
    state_dir: tempfile::TempDir,
    base_dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { state_dir: tempfile::tempdir().unwrap(), base_dir: tempfile::tempdir().unwrap() }
    }

    pub fn base_path(&self) -> &Path {
        self.base_dir.path()
    }

    /// The resolved control directory (`$XDG_STATE_HOME/pinokio`), matching
    /// `pinokio_daemon::config::control_dir`.
    pub fn control_path(&self) -> PathBuf {
        self.state_dir.path().join("pinokio")
    }

    /// Builds a `pinokio` invocation scoped to this project: an isolated
    /// `XDG_STATE_HOME` and a `--base-path` pointed at a scratch directory,
    /// so installs/caches never touch the real platform base path.
    pub fn pinokio(&self) -> CliBuilder {
        cli().env("XDG_STATE_HOME", self.state_dir.path()).args(&["--base-path"]).args(&[self
            .base_dir
            .path()
            .to_str()
            .unwrap()])
    }

    pub fn daemon_log(&self) -> String {
        std::fs::read_to_string(self.control_path().join("daemon.log")).unwrap_or_else(|_| "(no daemon log)".to_string())
    }

    pub fn pid_path(&self) -> PathBuf {
        self.control_path().join("daemon.pid")
    }

    pub fn socket_path(&self) -> PathBuf {
        self.control_path().join("daemon.sock")
    }

    /// Kills the daemon with SIGKILL, simulating a crash. Returns `true` if
    /// a PID file was found and the signal was delivered.
    pub fn daemon_kill(&self) -> bool {
        let Ok(content) = std::fs::read_to_string(self.pid_path()) else { return false };
        let Ok(pid) = content.trim().parse::<u32>() else { return false };
        Command::new("kill")
            .args(["-9", &pid.to_string()])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl Drop for Project {
    fn drop(&mut self) {
        // Best-effort: stop a daemon this test may have started. A no-op
        // (fast failure) if none is running.
        let mut cmd = self.pinokio().args(&["daemon", "stop"]).command();
        cmd.stdout(std::process::Stdio::null()).stderr(std::process::Stdio::null());
        let _ = cmd.status();
    }
}
