// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persistent URL book. Grounded on
//! `pinokio-cache`'s index persistence shape: a flat JSON array read whole
//! and rewritten atomically, since the record count is small (one per live
//! or recently-closed tunnel) compared to the cache's entry volume.

use chrono::Utc;
use pinokio_core::{Error, TunnelId, TunnelRecord};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct Book {
    path: PathBuf,
    records: HashMap<TunnelId, TunnelRecord>,
}

impl Book {
    pub fn new(root: &Path) -> Self {
        Self { path: root.join("book.json"), records: HashMap::new() }
    }

    /// Loads `tunnels/book.json`. A missing file is an empty book, not an
    /// error (first run on a fresh `base_path`).
    pub async fn load(&mut self) -> Result<(), Error> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let list: Vec<TunnelRecord> = serde_json::from_slice(&bytes).map_err(|e| Error::corrupt(e.to_string()))?;
                self.records = list.into_iter().map(|r| (r.id.clone(), r)).collect();
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(pinokio_shell::error::ShellError::from_io(&self.path, e).into()),
        }
    }

    async fn save(&self) -> Result<(), Error> {
        let list: Vec<&TunnelRecord> = self.records.values().collect();
        let bytes = serde_json::to_vec_pretty(&list).map_err(|e| Error::corrupt(e.to_string()))?;
        pinokio_shell::fs::atomic_write(&self.path, &bytes).await.map_err(Error::from)
    }

    pub fn get(&self, id: &TunnelId) -> Option<TunnelRecord> {
        self.records.get(id).cloned()
    }

    pub fn all(&self) -> Vec<TunnelRecord> {
        self.records.values().cloned().collect()
    }

    pub async fn upsert(&mut self, record: TunnelRecord) -> Result<(), Error> {
        self.records.insert(record.id.clone(), record);
        self.save().await
    }

    /// Marks `id` closed rather than deleting the row outright, so a closed
    /// tunnel's analytics survive for one more `List` before the next
    /// cleanup sweep prunes it. `List` itself filters closed entries out.
    pub async fn mark_closed(&mut self, id: &TunnelId) -> Result<(), Error> {
        if let Some(record) = self.records.get_mut(id) {
            record.status = pinokio_core::TunnelStatus::Closed;
            record.last_health_at = Some(Utc::now());
        }
        self.save().await
    }

    /// Drops closed records, called periodically so the book doesn't grow
    /// without bound.
    pub async fn prune_closed(&mut self) -> Result<usize, Error> {
        let before = self.records.len();
        self.records.retain(|_, r| r.status != pinokio_core::TunnelStatus::Closed);
        let removed = before - self.records.len();
        if removed > 0 {
            self.save().await?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "book_tests.rs"]
mod tests;
