// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recovery actions and their execution. Actions that only touch a
//! component already in this crate's dependency graph (Supervisor, Cache,
//! Tunnel Manager, a shell command) execute directly; actions that need
//! knowledge the recovery crate doesn't own (what "reset" means for an
//! app's environment, where its files live) go through [`RecoveryHooks`],
//! implemented by the daemon that wires every component together.

use pinokio_cache::CacheManager;
use pinokio_core::{AppId, Error, ProcessId};
use pinokio_supervisor::Supervisor;
use pinokio_tunnel::TunnelManager;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    RestartApplication,
    RestartDaemon,
    ClearCache,
    ReinstallDependencies,
    ResetEnvironment,
    FixPermissions,
    IncreaseMemory,
    RestartTunnels,
    /// `shell:<cmd>` — runs `cmd` through `sh -c`.
    Shell(String),
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryAction::RestartApplication => write!(f, "restart_application"),
            RecoveryAction::RestartDaemon => write!(f, "restart_daemon"),
            RecoveryAction::ClearCache => write!(f, "clear_cache"),
            RecoveryAction::ReinstallDependencies => write!(f, "reinstall_dependencies"),
            RecoveryAction::ResetEnvironment => write!(f, "reset_environment"),
            RecoveryAction::FixPermissions => write!(f, "fix_permissions"),
            RecoveryAction::IncreaseMemory => write!(f, "increase_memory"),
            RecoveryAction::RestartTunnels => write!(f, "restart_tunnels"),
            RecoveryAction::Shell(cmd) => write!(f, "shell:{cmd}"),
        }
    }
}

impl FromStr for RecoveryAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(match s {
            "restart_application" => RecoveryAction::RestartApplication,
            "restart_daemon" => RecoveryAction::RestartDaemon,
            "clear_cache" => RecoveryAction::ClearCache,
            "reinstall_dependencies" => RecoveryAction::ReinstallDependencies,
            "reset_environment" => RecoveryAction::ResetEnvironment,
            "fix_permissions" => RecoveryAction::FixPermissions,
            "increase_memory" => RecoveryAction::IncreaseMemory,
            "restart_tunnels" => RecoveryAction::RestartTunnels,
            other => match other.strip_prefix("shell:") {
                Some(cmd) => RecoveryAction::Shell(cmd.to_string()),
                None => return Err(Error::invalid_input(format!("unknown recovery action `{other}`"))),
            },
        })
    }
}

impl Serialize for RecoveryAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RecoveryAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Hooks the owning daemon implements for actions that need knowledge of
/// app-specific layout (environment directories, dependency manifests)
/// that this crate doesn't hold.
#[async_trait::async_trait]
pub trait RecoveryHooks: Send + Sync {
    async fn reinstall_dependencies(&self, app_id: &AppId) -> Result<(), Error>;
    async fn reset_environment(&self, app_id: &AppId) -> Result<(), Error>;
    async fn fix_permissions(&self, app_id: &AppId) -> Result<(), Error>;
    async fn increase_memory(&self, app_id: &AppId) -> Result<(), Error>;
}

/// Everything an action might need to act on. Fields are optional since a
/// given deployment may not wire every component (e.g. a test harness with
/// no tunnels).
#[derive(Clone, Default)]
pub struct ActionContext {
    pub app_id: Option<AppId>,
    pub process_id: Option<ProcessId>,
    pub supervisor: Option<Supervisor>,
    pub cache: Option<Arc<CacheManager>>,
    pub tunnels: Option<Arc<TunnelManager>>,
    pub daemon_shutdown: Option<CancellationToken>,
    pub hooks: Option<Arc<dyn RecoveryHooks>>,
}

impl ActionContext {
    /// Clones the shared component handles into a context scoped to one
    /// matched subject.
    pub fn for_subject(&self, app_id: Option<AppId>, process_id: Option<ProcessId>) -> Self {
        Self {
            app_id,
            process_id,
            supervisor: self.supervisor.clone(),
            cache: self.cache.clone(),
            tunnels: self.tunnels.clone(),
            daemon_shutdown: self.daemon_shutdown.clone(),
            hooks: self.hooks.clone(),
        }
    }
}

/// Executes `action` against `ctx`. Returns an error describing which
/// dependency was missing if the context can't support the action, so the
/// caller's action-chain loop (§4.L: "executes actions in order until one
/// succeeds") can fall through to the next one.
pub async fn execute(action: &RecoveryAction, ctx: &ActionContext) -> Result<(), Error> {
    match action {
        RecoveryAction::RestartApplication => {
            let supervisor = ctx.supervisor.as_ref().ok_or_else(|| Error::precondition("no supervisor wired for restart_application"))?;
            let process_id = ctx.process_id.clone().ok_or_else(|| Error::precondition("no process_id for restart_application"))?;
            supervisor.restart(process_id).await.map(|_| ())
        }
        RecoveryAction::RestartDaemon => {
            let token = ctx.daemon_shutdown.as_ref().ok_or_else(|| Error::precondition("no shutdown token wired for restart_daemon"))?;
            token.cancel();
            Ok(())
        }
        RecoveryAction::ClearCache => {
            let cache = ctx.cache.as_ref().ok_or_else(|| Error::precondition("no cache wired for clear_cache"))?;
            cache.cleanup().await
        }
        RecoveryAction::ReinstallDependencies => {
            let hooks = ctx.hooks.as_ref().ok_or_else(|| Error::precondition("no hooks wired for reinstall_dependencies"))?;
            let app_id = ctx.app_id.as_ref().ok_or_else(|| Error::precondition("no app_id for reinstall_dependencies"))?;
            hooks.reinstall_dependencies(app_id).await
        }
        RecoveryAction::ResetEnvironment => {
            let hooks = ctx.hooks.as_ref().ok_or_else(|| Error::precondition("no hooks wired for reset_environment"))?;
            let app_id = ctx.app_id.as_ref().ok_or_else(|| Error::precondition("no app_id for reset_environment"))?;
            hooks.reset_environment(app_id).await
        }
        RecoveryAction::FixPermissions => {
            let hooks = ctx.hooks.as_ref().ok_or_else(|| Error::precondition("no hooks wired for fix_permissions"))?;
            let app_id = ctx.app_id.as_ref().ok_or_else(|| Error::precondition("no app_id for fix_permissions"))?;
            hooks.fix_permissions(app_id).await
        }
        RecoveryAction::IncreaseMemory => {
            let hooks = ctx.hooks.as_ref().ok_or_else(|| Error::precondition("no hooks wired for increase_memory"))?;
            let app_id = ctx.app_id.as_ref().ok_or_else(|| Error::precondition("no app_id for increase_memory"))?;
            hooks.increase_memory(app_id).await
        }
        RecoveryAction::RestartTunnels => {
            let tunnels = ctx.tunnels.as_ref().ok_or_else(|| Error::precondition("no tunnel manager wired for restart_tunnels"))?;
            for record in tunnels.list().await {
                tunnels.close(&record.id).await?;
            }
            Ok(())
        }
        RecoveryAction::Shell(cmd) => {
            let opts = pinokio_shell::exec::ExecOptions {
                timeout: Some(std::time::Duration::from_secs(30)),
                ..Default::default()
            };
            let outcome = pinokio_shell::exec::run("sh", &["-c".to_string(), cmd.clone()], opts).await.map_err(Error::from)?;
            if outcome.exit_code == Some(0) {
                Ok(())
            } else {
                Err(Error::new(pinokio_core::ErrorKind::ExternalFailure, format!("shell action `{cmd}` exited {:?}", outcome.exit_code)))
            }
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
