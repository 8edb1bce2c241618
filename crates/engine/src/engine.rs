// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Install Engine: drives one app's install state machine end to end.
//!
//! Step numbering follows the install flow: load or build a profile,
//! build a typed installer script, validate user-supplied form inputs,
//! materialize an isolated environment and resolve dependency conflicts,
//! execute the installer's steps with checkpointing, then persist the
//! outcome. At most one install may be in flight per `AppId` at a time;
//! concurrent installs for distinct apps proceed independently.

use crate::driver::{self, ScriptInterpreter};
use crate::inputs::{validate_form, FieldSpec, FormValues};
use crate::progress::ProgressBus;
use crate::state_store::StateStore;
use crate::steps::{run_step, Checkpoint};
use crate::vars::VarScope;
use pinokio_catalog::{Analyzer, DependencyOrchestrator};
use pinokio_core::{AppCategory, AppId, AppProfile, AppState, Clock, Error, ErrorKind};
use pinokio_env::EnvManager;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Everything the Install Engine needs to drive one install, collected up
/// front so `install()` reads as the six numbered steps with no setup
/// noise interleaved.
pub struct InstallRequest {
    pub app_id: AppId,
    pub app_root: PathBuf,
    pub category_hint: AppCategory,
    pub form: Vec<FieldSpec>,
    pub values: FormValues,
    pub profile: Option<AppProfile>,
}

pub struct InstallEngine<C: Clock> {
    state_dir: PathBuf,
    env: Arc<EnvManager>,
    analyzer: Analyzer,
    progress: ProgressBus,
    clock: C,
    interpreter: Option<Arc<dyn ScriptInterpreter>>,
    in_flight: parking_lot::Mutex<HashSet<AppId>>,
}

/// Drops its app id out of the in-flight set on every exit path —
/// success, error, or an early `?` return.
struct InFlightGuard<'a, C: Clock> {
    engine: &'a InstallEngine<C>,
    app_id: AppId,
}

impl<C: Clock> Drop for InFlightGuard<'_, C> {
    fn drop(&mut self) {
        self.engine.in_flight.lock().remove(&self.app_id);
    }
}

impl<C: Clock> InstallEngine<C> {
    pub fn new(state_dir: impl Into<PathBuf>, env: Arc<EnvManager>, clock: C) -> Self {
        Self {
            state_dir: state_dir.into(),
            env,
            analyzer: Analyzer::new(),
            progress: ProgressBus::new(),
            clock,
            interpreter: None,
            in_flight: parking_lot::Mutex::new(HashSet::new()),
        }
    }

    pub fn with_interpreter(mut self, interpreter: Arc<dyn ScriptInterpreter>) -> Self {
        self.interpreter = Some(interpreter);
        self
    }

    pub fn watch_progress(&self) -> tokio::sync::broadcast::Receiver<pinokio_core::Event> {
        self.progress.watch()
    }

    fn store(&self) -> StateStore {
        StateStore::new(&self.state_dir)
    }

    fn claim(&self, app_id: &AppId) -> Result<InFlightGuard<'_, C>, Error> {
        let mut in_flight = self.in_flight.lock();
        if !in_flight.insert(app_id.clone()) {
            return Err(Error::new(ErrorKind::Conflict, format!("install already in flight for {app_id}")));
        }
        drop(in_flight);
        Ok(InFlightGuard { engine: self, app_id: app_id.clone() })
    }

    /// Runs the full install flow for `request`. On success the returned
    /// profile's `hash` is the one persisted in the app's state record.
    pub async fn install(&self, request: InstallRequest) -> Result<AppProfile, Error> {
        let _guard = self.claim(&request.app_id)?;
        let store = self.store();
        let mut record = store.load(&request.app_id).await?;

        // Step 1: load or build the profile.
        record.transition(AppState::Analyzing, &self.clock)?;
        store.save(&record).await?;
        self.emit(&request.app_id, "analyzing", "analyzing app source tree");
        let profile = match request.profile {
            Some(profile) => profile,
            None => self.analyzer.analyze(&request.app_id, &request.app_root, request.category_hint).await?,
        };

        // Step 3: validate typed form inputs before any side effect.
        let resolved_inputs = validate_form(&request.form, &request.values)?;

        // Step 2: build the installer script for the detected kind.
        let mut vars = self.run_vars(&request.app_root);
        vars.namespace_vars("args", &resolved_inputs);
        let steps = driver::build_steps(&profile, &request.app_root, &vars, self.interpreter.as_deref())?;

        // Step 4: materialize the environment and resolve dependencies.
        let next_state = if profile.deps.is_empty() { AppState::Installing } else { AppState::NeedsDeps };
        record.transition(next_state, &self.clock)?;
        store.save(&record).await?;
        if next_state == AppState::NeedsDeps {
            let report = DependencyOrchestrator::analyze(&profile.deps, Duration::ZERO);
            if !report.remaining.is_empty() {
                let failure = pinokio_core::Failure {
                    kind: ErrorKind::DependencyConflict,
                    step: None,
                    message: format!("{} unresolved critical dependency conflict(s)", report.remaining.len()),
                    log_tail: report.remaining.iter().map(|c| c.detail.clone()).collect(),
                };
                record.failure = Some(failure);
                record.transition(AppState::Failed, &self.clock)?;
                store.save(&record).await?;
                return Err(Error::new(ErrorKind::DependencyConflict, "unresolved critical dependency conflicts"));
            }
            record.transition(AppState::Installing, &self.clock)?;
            store.save(&record).await?;
        }
        self.emit(&request.app_id, "installing", "materializing isolated environment");
        let env_handle = self.env.ensure(&request.app_id, &profile.deps).await?;
        vars.namespace_vars("env", &self.env.activate(&env_handle));

        // Step 5: execute installer steps sequentially, checkpointed.
        if let Err(err) = self.run_steps(&request.app_id, &steps, &request.app_root, &vars, &mut record, &store).await {
            return Err(err);
        }

        // Step 6: record success with the profile hash.
        record.profile_hash = Some(profile.hash.clone());
        record.transition(AppState::Installed, &self.clock)?;
        store.save(&record).await?;
        self.emit(&request.app_id, "installed", "install complete");
        tracing::info!(app_id = %request.app_id, hash = %profile.hash, "install completed");
        Ok(profile)
    }

    async fn run_steps(
        &self,
        app_id: &AppId,
        steps: &[crate::steps::InstallStep],
        cwd: &Path,
        vars: &VarScope,
        record: &mut pinokio_core::AppStateRecord,
        store: &StateStore,
    ) -> Result<(), Error> {
        let mut checkpoint = Checkpoint::load(&self.state_dir, app_id.as_str()).await?;
        for (index, step) in steps.iter().enumerate() {
            let pct = if steps.is_empty() { None } else { Some(((index * 100) / steps.len()) as u8) };
            self.progress.emit(&self.clock, app_id.clone(), "installing", format!("running step `{}`", step.id), pct);
            if let Err(err) = run_step(step, cwd, vars, &mut checkpoint).await {
                tracing::warn!(%app_id, step = %step.id, step_index = index, error = %err, "install step failed");
                record.failure = Some(pinokio_core::Failure {
                    kind: err.kind,
                    step: Some(index),
                    message: err.message.clone(),
                    log_tail: Vec::new(),
                });
                record.transition(AppState::Failed, &self.clock)?;
                store.save(record).await?;
                self.emit(app_id, "failed", &err.message);
                return Err(err);
            }
        }
        Ok(())
    }

    fn run_vars(&self, cwd: &Path) -> VarScope {
        let platform = pinokio_platform::detect();
        VarScope::with_run_context(
            platform.kind.as_str(),
            if platform.has_feature(pinokio_core::PlatformFeatures::GPU) { "available" } else { "none" },
            &cwd.to_string_lossy(),
            None,
            self.clock.utc_now().timestamp(),
            &platform.base_path.to_string_lossy(),
        )
    }

    fn emit(&self, app_id: &AppId, phase: &str, message: impl Into<String>) {
        self.progress.emit(&self.clock, app_id.clone(), phase, message, None);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
