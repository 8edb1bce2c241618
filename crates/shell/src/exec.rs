// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronous and streaming command execution.
//!
//! The streaming form yields output line-records to a bounded channel.
//! Scoped acquisition of the child process guarantees reap on every exit
//! path: success, error, cancellation, or parent shutdown. That guarantee
//! is implemented with an RAII guard (`ChildGuard`) whose `Drop` kills the
//! process group if the child is still alive, tying process lifetime to a
//! scope rather than to manual cleanup calls scattered at call sites.

use crate::error::ShellError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LineRecord {
    pub stream: Stream,
    pub line: String,
    pub t: chrono::DateTime<chrono::Utc>,
}

/// Options shared by the synchronous and streaming execution forms.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    pub cwd: Option<PathBuf>,
    /// Overlays (never replaces) the inherited environment.
    pub env: HashMap<String, String>,
    pub timeout: Option<Duration>,
    pub input: Option<String>,
    /// Create `cwd` if it doesn't exist yet.
    pub create_cwd: bool,
    /// Kill the whole process group, not just the direct child, on cancel.
    pub kill_tree_on_cancel: bool,
}

#[derive(Debug, Clone)]
pub struct ExecOutcome {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

fn build_command(program: &str, args: &[String], opts: &ExecOptions) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(cwd) = &opts.cwd {
        cmd.current_dir(cwd);
    }
    for (k, v) in &opts.env {
        cmd.env(k, v);
    }
    cmd.stdin(Stdio::piped());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    #[cfg(unix)]
    {
        // New process group so kill-tree on cancel can signal every
        // descendant via killpg instead of only the direct child.
        cmd.process_group(0);
    }
    cmd
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn kill_process_group(pid: u32, force: bool) {
    // SAFETY: killpg/kill only read the pid argument; no aliasing or
    // pointer safety concerns. Negative pid targets the process group.
    unsafe {
        let signal = if force { libc::SIGKILL } else { libc::SIGTERM };
        libc::killpg(pid as i32, signal);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: u32, _force: bool) {}

/// RAII guard that force-kills the child's process group if it is still
/// running when dropped, so a caller that returns early (error, cancel,
/// panic-unwind) never leaks a process.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn pid(&self) -> Option<u32> {
        self.child.id()
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        if let Some(pid) = self.pid() {
            kill_process_group(pid, true);
        }
        let _ = self.child.start_kill();
    }
}

/// Runs `program` to completion and captures all output (no streaming).
pub async fn run(program: &str, args: &[String], opts: ExecOptions) -> Result<ExecOutcome, ShellError> {
    if opts.create_cwd {
        if let Some(cwd) = &opts.cwd {
            crate::fs::ensure_dir(cwd).await?;
        }
    }

    let mut cmd = build_command(program, args, &opts);
    let child = cmd.spawn().map_err(|e| ShellError::from_io(&PathBuf::from(program), e))?;
    let mut guard = ChildGuard { child, reaped: false };

    if let Some(input) = &opts.input {
        use tokio::io::AsyncWriteExt;
        if let Some(mut stdin) = guard.child.stdin.take() {
            let _ = stdin.write_all(input.as_bytes()).await;
        }
    } else {
        drop(guard.child.stdin.take());
    }

    let wait = guard.child.wait_with_output();
    let output = match opts.timeout {
        Some(d) => tokio::time::timeout(d, wait).await.map_err(|_| ShellError::Timeout(d))?,
        None => wait.await,
    }
    .map_err(|e| ShellError::from_io(&PathBuf::from(program), e))?;

    Ok(ExecOutcome {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Runs `program`, yielding output line-records to a bounded channel as
/// they arrive. Reaping is guaranteed on every exit path via `ChildGuard`.
pub async fn run_streaming(
    program: &str,
    args: &[String],
    opts: ExecOptions,
    cancel: CancellationToken,
) -> Result<
    (mpsc::Receiver<LineRecord>, Option<u32>, tokio::task::JoinHandle<Result<Option<i32>, ShellError>>),
    ShellError,
> {
    if opts.create_cwd {
        if let Some(cwd) = &opts.cwd {
            crate::fs::ensure_dir(cwd).await?;
        }
    }

    let kill_tree = opts.kill_tree_on_cancel;
    let timeout = opts.timeout;
    let mut cmd = build_command(program, args, &opts);
    let mut child = cmd.spawn().map_err(|e| ShellError::from_io(&PathBuf::from(program), e))?;
    let pid = child.id();

    // build_command always sets Stdio::piped() for stdout/stderr, and this
    // is the only place that takes them, so both are always Some here.
    #[allow(clippy::expect_used)]
    let stdout = child.stdout.take().expect("stdout piped by build_command");
    #[allow(clippy::expect_used)]
    let stderr = child.stderr.take().expect("stderr piped by build_command");
    drop(child.stdin.take());

    let (tx, rx) = mpsc::channel(256);

    let handle = tokio::spawn(async move {
        let mut guard = ChildGuard { child, reaped: false };
        let pid = guard.pid();

        let tx_out = tx.clone();
        let out_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let _ = tx_out
                    .send(LineRecord { stream: Stream::Stdout, line, t: chrono::Utc::now() })
                    .await;
            }
        });
        let tx_err = tx.clone();
        let err_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let _ = tx_err
                    .send(LineRecord { stream: Stream::Stderr, line, t: chrono::Utc::now() })
                    .await;
            }
        });
        drop(tx);

        let wait = guard.child.wait();
        let result = tokio::select! {
            status = wait => status.map_err(|e| ShellError::from_io(&PathBuf::from(program), e)).map(|s| s.code()),
            _ = cancel.cancelled() => {
                if let Some(pid) = pid {
                    kill_process_group(pid, kill_tree);
                }
                let _ = guard.child.start_kill();
                Err(ShellError::Cancelled)
            }
            _ = async {
                match timeout {
                    Some(d) => tokio::time::sleep(d).await,
                    None => std::future::pending().await,
                }
            } => {
                if let Some(pid) = pid {
                    kill_process_group(pid, true);
                }
                let _ = guard.child.start_kill();
                Err(ShellError::Timeout(timeout.unwrap_or_default()))
            }
        };

        let _ = out_task.await;
        let _ = err_task.await;
        guard.reaped = true;
        result
    });

    Ok((rx, pid, handle))
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
