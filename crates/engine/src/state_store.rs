// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persists [`AppStateRecord`] under `state/<app_id>.json`, one file per
//! app, written atomically so a crash mid-write never leaves a torn
//! record behind.

use pinokio_core::{AppId, AppStateRecord, Error, ErrorKind};
use std::path::{Path, PathBuf};

pub struct StateStore {
    state_dir: PathBuf,
}

impl StateStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self { state_dir: state_dir.into() }
    }

    fn record_path(&self, app_id: &AppId) -> PathBuf {
        self.state_dir.join(format!("{}.json", app_id.as_str()))
    }

    pub async fn load(&self, app_id: &AppId) -> Result<AppStateRecord, Error> {
        let path = self.record_path(app_id);
        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| Error::corrupt(format!("state record at {}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppStateRecord::new(app_id.clone())),
            Err(e) => Err(Error::new(ErrorKind::Internal, format!("reading {}: {e}", path.display()))),
        }
    }

    pub async fn save(&self, record: &AppStateRecord) -> Result<(), Error> {
        pinokio_shell::fs::ensure_dir(&self.state_dir).await.map_err(Error::from)?;
        let bytes = serde_json::to_vec_pretty(record).map_err(Error::corrupt)?;
        pinokio_shell::fs::atomic_write(&self.record_path(&record.app_id), &bytes).await.map_err(Error::from)
    }

    pub async fn remove(&self, app_id: &AppId) -> Result<(), Error> {
        let path = self.record_path(app_id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::new(ErrorKind::Internal, format!("removing {}: {e}", path.display()))),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }
}

#[cfg(test)]
#[path = "state_store_tests.rs"]
mod tests;
