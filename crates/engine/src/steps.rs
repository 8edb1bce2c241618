// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Install steps and their checkpointed, idempotent execution.
//!
//! Each step has a stable `id`; the runner persists the set of completed
//! step ids to disk after every success, so a resumed install (daemon
//! restart mid-install, a retried `pinokio install`) skips steps already
//! applied instead of re-running `pip install` or re-cloning a repo.

use crate::vars::VarScope;
use pinokio_core::Error;
use pinokio_shell::exec::ExecOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StepOp {
    Shell(String),
    ShellScript(PathBuf),
    EnsureDir(PathBuf),
    CopyTree { from: PathBuf, to: PathBuf },
    PipInstall(Vec<String>),
    CondaInstall(Vec<String>),
    CondaEnvFile(PathBuf),
    NpmInstall(Vec<String>),
    SystemInstall(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallStep {
    pub id: String,
    pub op: StepOp,
}

impl InstallStep {
    pub fn new(id: impl Into<String>, op: StepOp) -> Self {
        Self { id: id.into(), op }
    }
}

/// Tracks which step ids have completed for one install run, persisted as
/// a flat JSON array under `<state_dir>/<app_id>.checkpoint.json`.
pub struct Checkpoint {
    path: PathBuf,
    done: HashSet<String>,
}

impl Checkpoint {
    pub async fn load(state_dir: &Path, app_id: &str) -> Result<Self, Error> {
        let path = state_dir.join(format!("{app_id}.checkpoint.json"));
        let done = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(Error::corrupt)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(Error::new(pinokio_core::ErrorKind::Internal, format!("reading checkpoint: {e}"))),
        };
        Ok(Self { path, done })
    }

    pub fn is_done(&self, step_id: &str) -> bool {
        self.done.contains(step_id)
    }

    async fn mark_done(&mut self, step_id: &str) -> Result<(), Error> {
        self.done.insert(step_id.to_string());
        let bytes = serde_json::to_vec(&self.done).map_err(Error::corrupt)?;
        pinokio_shell::fs::atomic_write(&self.path, &bytes).await.map_err(Error::from)?;
        Ok(())
    }

    pub async fn clear(&mut self) -> Result<(), Error> {
        self.done.clear();
        let _ = tokio::fs::remove_file(&self.path).await;
        Ok(())
    }
}

/// Outcome of running one step's shell command, when it ran one.
pub struct StepOutcome {
    pub skipped: bool,
    pub log_tail: Vec<String>,
}

/// Runs `step` against `cwd`/`vars` unless `checkpoint` already marks it
/// done, then records completion. Shell-shaped ops resolve through the
/// substitution environment before exec; `EnsureDir`/`CopyTree` are plain
/// filesystem ops with no substitution.
pub async fn run_step(step: &InstallStep, cwd: &Path, vars: &VarScope, checkpoint: &mut Checkpoint) -> Result<StepOutcome, Error> {
    if checkpoint.is_done(&step.id) {
        return Ok(StepOutcome { skipped: true, log_tail: vec![] });
    }
    let log_tail = execute(&step.op, cwd, vars).await?;
    checkpoint.mark_done(&step.id).await?;
    Ok(StepOutcome { skipped: false, log_tail })
}

async fn run_shell(cmd: &str, cwd: &Path) -> Result<Vec<String>, Error> {
    let opts = ExecOptions { cwd: Some(cwd.to_path_buf()), ..Default::default() };
    let outcome = pinokio_shell::exec::run("sh", &["-c".to_string(), cmd.to_string()], opts).await.map_err(Error::from)?;
    let tail: Vec<String> = outcome.stderr.lines().chain(outcome.stdout.lines()).rev().take(50).map(str::to_string).collect();
    if outcome.exit_code != Some(0) {
        return Err(Error::new(pinokio_core::ErrorKind::ExternalFailure, format!("`{cmd}` exited {:?}", outcome.exit_code)));
    }
    Ok(tail)
}

async fn execute(op: &StepOp, cwd: &Path, vars: &VarScope) -> Result<Vec<String>, Error> {
    match op {
        StepOp::Shell(cmd) => {
            let expanded = vars.expand(cmd).map_err(|key| {
                Error::new(pinokio_core::ErrorKind::InvalidInput, format!("unresolved variable `{key}` in step"))
            })?;
            run_shell(&expanded, cwd).await
        }
        StepOp::ShellScript(path) => run_shell(&format!("sh {}", path.display()), cwd).await,
        StepOp::EnsureDir(path) => {
            pinokio_shell::fs::ensure_dir(path).await.map_err(Error::from)?;
            Ok(vec![])
        }
        StepOp::CopyTree { from, to } => {
            pinokio_shell::fs::copy_tree(from, to).await.map_err(Error::from)?;
            Ok(vec![])
        }
        StepOp::PipInstall(pkgs) => run_shell(&format!("pip install {}", pkgs.join(" ")), cwd).await,
        StepOp::CondaInstall(pkgs) => run_shell(&format!("conda install -y {}", pkgs.join(" ")), cwd).await,
        StepOp::CondaEnvFile(path) => run_shell(&format!("conda env update -f {}", path.display()), cwd).await,
        StepOp::NpmInstall(pkgs) => run_shell(&format!("npm install {}", pkgs.join(" ")), cwd).await,
        StepOp::SystemInstall(pkgs) => run_shell(&format!("apt-get install -y {}", pkgs.join(" ")), cwd).await,
    }
}

#[cfg(test)]
#[path = "steps_tests.rs"]
mod tests;
