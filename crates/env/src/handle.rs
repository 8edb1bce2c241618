// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Refcounted handle to a live environment.

use crate::manager::Inner;
use pinokio_core::id::AppId;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A live reference to an app's environment directory. Cloning increments
/// the environment's refcount; dropping the last handle triggers deletion
/// if the environment has been marked for destruction.
pub struct EnvHandle {
    inner: Arc<Inner>,
    app_id: AppId,
    path: PathBuf,
}

impl EnvHandle {
    pub(crate) fn new(inner: Arc<Inner>, app_id: AppId, path: PathBuf) -> Self {
        Self { inner, app_id, path }
    }

    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Clone for EnvHandle {
    fn clone(&self) -> Self {
        if let Some(entry) = self.inner.envs.lock().get_mut(&self.app_id) {
            entry.refcount += 1;
        }
        Self { inner: self.inner.clone(), app_id: self.app_id.clone(), path: self.path.clone() }
    }
}

impl Drop for EnvHandle {
    fn drop(&mut self) {
        self.inner.release(self.app_id.clone());
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
