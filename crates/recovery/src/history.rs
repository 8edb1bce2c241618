// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recovery history: a 24h-retained log of attempted recovery actions,
//! persisted so cooldowns survive a daemon restart. Grounded on
//! `pinokio-cache`'s index-over-JSON persistence shape (load on start,
//! atomic-write on every mutation).

use crate::action::RecoveryAction;
use chrono::{DateTime, Utc};
use pinokio_core::{AppId, Error};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const RETENTION: chrono::Duration = chrono::Duration::hours(24);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryAttempt {
    pub pattern_id: String,
    pub app_id: Option<AppId>,
    pub action: RecoveryAction,
    pub succeeded: bool,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecoveryStats {
    pub total_attempts: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub by_pattern: HashMap<String, usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Persisted {
    attempts: Vec<RecoveryAttempt>,
    /// Last-fired timestamp per pattern, kept separately from `attempts`
    /// so a pattern's cooldown survives even after its attempts age out of
    /// the 24h retention window.
    last_fired: HashMap<String, DateTime<Utc>>,
}

/// Owns the in-memory recovery log and its on-disk mirror at
/// `state/recovery_history.json`.
pub struct History {
    path: PathBuf,
    state: Persisted,
}

impl History {
    pub fn new(state_dir: &Path) -> Self {
        Self { path: state_dir.join("recovery_history.json"), state: Persisted::default() }
    }

    /// Loads the persisted history. A missing file is an empty history,
    /// not an error (first run).
    pub async fn load(&mut self) -> Result<(), Error> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                self.state = serde_json::from_slice(&bytes).map_err(|e| Error::corrupt(e.to_string()))?;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(pinokio_shell::error::ShellError::from_io(&self.path, e).into()),
        }
    }

    async fn save(&self) -> Result<(), Error> {
        let bytes = serde_json::to_vec_pretty(&self.state).map_err(|e| Error::corrupt(e.to_string()))?;
        pinokio_shell::fs::atomic_write(&self.path, &bytes).await.map_err(Error::from)
    }

    /// Whether `pattern_id`'s cooldown has elapsed as of `now`.
    pub fn in_cooldown(&self, pattern_id: &str, cooldown: std::time::Duration, now: DateTime<Utc>) -> bool {
        match self.state.last_fired.get(pattern_id) {
            Some(last) => now.signed_duration_since(*last) < chrono::Duration::from_std(cooldown).unwrap_or(chrono::Duration::zero()),
            None => false,
        }
    }

    /// How many attempts against `pattern_id` are recorded within the 24h
    /// retention window, used to enforce `max_attempts`.
    pub fn attempts_in_window(&self, pattern_id: &str, now: DateTime<Utc>) -> u32 {
        self.state
            .attempts
            .iter()
            .filter(|a| a.pattern_id == pattern_id && now.signed_duration_since(a.at) < RETENTION)
            .count() as u32
    }

    /// Records an attempt, stamps the pattern's `last_fired`, and persists.
    /// Also prunes attempts older than the retention window.
    pub async fn record(&mut self, attempt: RecoveryAttempt) -> Result<(), Error> {
        let now = attempt.at;
        self.state.last_fired.insert(attempt.pattern_id.clone(), now);
        self.state.attempts.push(attempt);
        self.state.attempts.retain(|a| now.signed_duration_since(a.at) < RETENTION);
        self.save().await
    }

    pub fn attempts(&self) -> &[RecoveryAttempt] {
        &self.state.attempts
    }

    pub fn stats(&self) -> RecoveryStats {
        let mut stats = RecoveryStats::default();
        for attempt in &self.state.attempts {
            stats.total_attempts += 1;
            if attempt.succeeded {
                stats.succeeded += 1;
            } else {
                stats.failed += 1;
            }
            *stats.by_pattern.entry(attempt.pattern_id.clone()).or_default() += 1;
        }
        stats
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
