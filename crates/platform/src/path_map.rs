// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logical-to-absolute path mapping. Every other component
//! resolves its on-disk locations through a `PathMap` instead of building
//! paths by hand, so the on-disk layout stays centralized in one place.

use pinokio_core::id::AppId;
use pinokio_core::platform::{Platform, PathKind};
use pinokio_shell::error::ShellError;
use std::path::PathBuf;

/// Resolves the on-disk layout against a detected [`Platform`].
pub struct PathMap {
    base_path: PathBuf,
}

impl PathMap {
    pub fn new(platform: &Platform) -> Self {
        Self { base_path: platform.base_path.clone() }
    }

    /// Maps a logical path, optionally scoped to `app_id`, to an absolute
    /// path under the platform's base path. Deterministic: the same inputs
    /// always produce the same output.
    pub fn map(&self, kind: PathKind, app_id: Option<&AppId>) -> PathBuf {
        let root = self.base_path.join(kind.dir_name());
        match app_id {
            Some(id) => root.join(id.as_str()),
            None => root,
        }
    }

    /// Like [`Self::map`] but also creates the resolved directory (and any
    /// missing parents) before returning it.
    pub async fn ensure(&self, kind: PathKind, app_id: Option<&AppId>) -> Result<PathBuf, ShellError> {
        let path = self.map(kind, app_id);
        pinokio_shell::fs::ensure_dir(&path).await?;
        Ok(path)
    }

    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }
}

#[cfg(test)]
#[path = "path_map_tests.rs"]
mod tests;
