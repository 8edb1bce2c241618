// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment lifecycle: create/acquire, activate, and destroy,
//! with a reproducibility check (lockfile hash) and refcounted, deferred
//! deletion. Grounded on `oj-daemon/src/adapters/workspace.rs`'s
//! provision/cleanup shape, generalized from one-shot workspace directories
//! to refcounted shared environments.

use crate::handle::EnvHandle;
use pinokio_core::id::AppId;
use pinokio_core::platform::PathKind;
use pinokio_core::profile::Deps;
use pinokio_core::Error;
use pinokio_platform::PathMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

pub(crate) struct EnvEntry {
    pub(crate) lockfile_hash: String,
    pub(crate) refcount: usize,
    pub(crate) marked_for_destroy: bool,
}

pub(crate) struct Inner {
    pub(crate) path_map: Arc<PathMap>,
    pub(crate) envs: Mutex<HashMap<AppId, EnvEntry>>,
}

impl Inner {
    /// Called from [`EnvHandle::drop`]. Decrements the refcount and, if this
    /// was the last handle and the environment is marked for destruction,
    /// schedules a best-effort background deletion. Never panics: if no
    /// Tokio runtime is available at drop time, the directory is left on
    /// disk for a later `destroy` call to clean up.
    pub(crate) fn release(self: &Arc<Self>, app_id: AppId) {
        let should_delete = {
            let mut envs = self.envs.lock();
            match envs.get_mut(&app_id) {
                Some(entry) => {
                    entry.refcount = entry.refcount.saturating_sub(1);
                    entry.refcount == 0 && entry.marked_for_destroy
                }
                None => false,
            }
        };

        if !should_delete {
            return;
        }

        let inner = self.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                rt.spawn(async move {
                    let path = inner.path_map.map(PathKind::Env, Some(&app_id));
                    if let Err(e) = pinokio_shell::fs::remove_tree(&path).await {
                        tracing::warn!(%app_id, error = %e, "failed to remove environment directory on last handle release");
                    }
                    inner.envs.lock().remove(&app_id);
                });
            }
            Err(_) => {
                tracing::warn!(%app_id, "no tokio runtime available to reap released environment; leaving on disk");
            }
        }
    }
}

/// Owns every app's environment directory and its refcounted lifecycle.
pub struct EnvManager {
    inner: Arc<Inner>,
}

impl EnvManager {
    pub fn new(path_map: Arc<PathMap>) -> Self {
        Self { inner: Arc::new(Inner { path_map, envs: Mutex::new(HashMap::new()) }) }
    }

    /// Creates the environment for `app_id` if absent, or acquires a handle
    /// to the existing one. Refuses to reuse an environment whose recorded
    /// lockfile hash diverges from `deps`.
    pub async fn ensure(&self, app_id: &AppId, deps: &Deps) -> Result<EnvHandle, Error> {
        let hash = crate::lockfile::lockfile_hash(deps);
        let env_path = self.inner.path_map.ensure(PathKind::Env, Some(app_id)).await.map_err(Error::from)?;

        {
            let mut envs = self.inner.envs.lock();
            match envs.get_mut(app_id) {
                Some(entry) if entry.marked_for_destroy => {
                    return Err(Error::conflict(format!("environment for {app_id} is pending destruction")));
                }
                Some(entry) if entry.lockfile_hash != hash => {
                    return Err(Error::conflict(format!(
                        "environment for {app_id} has drifted from its lockfile"
                    )));
                }
                Some(entry) => entry.refcount += 1,
                None => {
                    envs.insert(app_id.clone(), EnvEntry { lockfile_hash: hash.clone(), refcount: 1, marked_for_destroy: false });
                }
            }
        }

        let lockfile_path = env_path.join(".pinokio-lockfile");
        pinokio_shell::fs::atomic_write(&lockfile_path, hash.as_bytes()).await.map_err(Error::from)?;

        Ok(EnvHandle::new(self.inner.clone(), app_id.clone(), env_path))
    }

    /// Builds the environment-variable overlay for activating `handle`.
    /// Never mutates process or shell state — the caller merges this into
    /// a child process's environment (see
    /// `pinokio_shell::exec::ExecOptions::env`).
    pub fn activate(&self, handle: &EnvHandle) -> HashMap<String, String> {
        let mut overlay = HashMap::new();
        let bin = handle.path().join("bin");
        let existing_path = std::env::var("PATH").unwrap_or_default();
        overlay.insert("PATH".to_string(), format!("{}:{existing_path}", bin.display()));
        overlay.insert("PINOKIO_ENV".to_string(), handle.path().display().to_string());
        overlay
    }

    /// Marks the environment as destroyed. If no handle is currently
    /// outstanding, the directory is deleted immediately; otherwise deletion
    /// is deferred until the last handle is dropped.
    pub async fn destroy(&self, app_id: &AppId) -> Result<(), Error> {
        let delete_now = {
            let mut envs = self.inner.envs.lock();
            match envs.get_mut(app_id) {
                Some(entry) => {
                    entry.marked_for_destroy = true;
                    entry.refcount == 0
                }
                None => return Err(Error::not_found(format!("no environment for {app_id}"))),
            }
        };

        if delete_now {
            let path: PathBuf = self.inner.path_map.map(PathKind::Env, Some(app_id));
            pinokio_shell::fs::remove_tree(&path).await.map_err(Error::from)?;
            self.inner.envs.lock().remove(app_id);
        }
        Ok(())
    }

    /// Whether an environment is currently tracked for `app_id`.
    pub fn exists(&self, app_id: &AppId) -> bool {
        self.inner.envs.lock().contains_key(app_id)
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
