// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installer drivers: turn a detected [`InstallerKind`] into a concrete,
//! ordered [`InstallStep`] sequence.
//!
//! JS and JSON installers (Pinokio's native `install.js`/`install.json`
//! scripts) are not interpreted here — that is a pluggable capability
//! supplied by a [`ScriptInterpreter`] the caller wires in, since
//! evaluating arbitrary third-party script is a concern this crate does
//! not own. The requirements/environment/script kinds are deterministic:
//! this crate expands them directly into shell and filesystem operations.

use crate::steps::{InstallStep, StepOp};
use crate::vars::VarScope;
use pinokio_core::{AppProfile, Error, ErrorKind, InstallerKind};
use std::path::Path;

/// Evaluates a JS or JSON installer script into install steps. The engine
/// ships no implementation of this trait; a daemon-level adapter supplies
/// one backed by an embedded JS runtime.
pub trait ScriptInterpreter: Send + Sync {
    fn build_steps(&self, script_path: &Path, vars: &VarScope) -> Result<Vec<InstallStep>, Error>;
}

/// Builds the ordered step sequence for `profile`, rooted at `app_root`
/// (the analyzed source tree). `interpreter` is consulted only for
/// [`InstallerKind::Js`]/[`InstallerKind::Json`].
pub fn build_steps(
    profile: &AppProfile,
    app_root: &Path,
    vars: &VarScope,
    interpreter: Option<&dyn ScriptInterpreter>,
) -> Result<Vec<InstallStep>, Error> {
    match profile.installer_kind {
        InstallerKind::Js | InstallerKind::Json => {
            let interpreter = interpreter.ok_or_else(|| {
                Error::new(ErrorKind::Unsupported, "no script interpreter configured for js/json installers")
            })?;
            let script_name = if profile.installer_kind == InstallerKind::Js { "install.js" } else { "install.json" };
            interpreter.build_steps(&app_root.join(script_name), vars)
        }
        InstallerKind::Requirements => Ok(requirements_steps(profile)),
        InstallerKind::Environment => Ok(environment_steps(profile, app_root)),
        InstallerKind::Script => script_steps(app_root, vars),
        InstallerKind::Unknown => Err(Error::new(ErrorKind::Unsupported, "app has no recognized installer")),
    }
}

fn requirements_steps(profile: &AppProfile) -> Vec<InstallStep> {
    let mut steps = Vec::new();
    if !profile.deps.system.is_empty() {
        steps.push(InstallStep::new("install-system-deps", StepOp::SystemInstall(profile.deps.system.clone())));
    }
    if !profile.deps.conda.is_empty() {
        steps.push(InstallStep::new("install-conda-deps", StepOp::CondaInstall(profile.deps.conda.clone())));
    }
    if !profile.deps.pip.is_empty() {
        steps.push(InstallStep::new("install-pip-deps", StepOp::PipInstall(profile.deps.pip.clone())));
    }
    if !profile.deps.npm.is_empty() {
        steps.push(InstallStep::new("install-npm-deps", StepOp::NpmInstall(profile.deps.npm.clone())));
    }
    steps
}

fn environment_steps(profile: &AppProfile, app_root: &Path) -> Vec<InstallStep> {
    let mut steps = requirements_steps(profile);
    let env_file = app_root.join("environment.yaml");
    if env_file.exists() {
        steps.insert(0, InstallStep::new("materialize-conda-env", StepOp::CondaEnvFile(env_file)));
    }
    steps
}

fn script_steps(app_root: &Path, _vars: &VarScope) -> Result<Vec<InstallStep>, Error> {
    let candidates = ["install.sh", "install.bash", "setup.sh"];
    let script = candidates
        .iter()
        .map(|name| app_root.join(name))
        .find(|path| path.exists())
        .ok_or_else(|| Error::new(ErrorKind::NotFound, "no install script found in app root"))?;
    Ok(vec![InstallStep::new("run-install-script", StepOp::ShellScript(script))])
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
