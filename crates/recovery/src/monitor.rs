// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Error Recovery engine: taps the Supervisor's log-line broadcast and
//! the Health Monitor's event stream, matches each line/event against the
//! pattern table, and — respecting per-pattern cooldown and attempt caps —
//! runs the pattern's actions in order until one succeeds.
//!
//! Grounded on `pinokio-health::HealthMonitor`'s single-task-owns-shared-
//! state shape, generalized from scheduled polling to reactive matching
//! over two incoming broadcast streams.

use crate::action::{self, ActionContext, RecoveryAction};
use crate::history::{History, RecoveryAttempt};
use crate::pattern::ErrorPattern;
use chrono::Utc;
use parking_lot::Mutex;
use pinokio_core::{AppId, Event};
use pinokio_supervisor::{LogLine, Supervisor};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

/// Owns the pattern table, the persisted history, and the two tap tasks.
pub struct ErrorRecovery {
    patterns: Mutex<Vec<ErrorPattern>>,
    history: AsyncMutex<History>,
    ctx: ActionContext,
    events_tx: broadcast::Sender<Event>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ErrorRecovery {
    pub fn new(state_dir: &Path, ctx: ActionContext) -> Arc<Self> {
        let (events_tx, _) = broadcast::channel(1024);
        Arc::new(Self {
            patterns: Mutex::new(crate::pattern::default_patterns()),
            history: AsyncMutex::new(History::new(state_dir)),
            ctx,
            events_tx,
            tasks: Mutex::new(Vec::new()),
        })
    }

    pub async fn load(&self) -> Result<(), pinokio_core::Error> {
        self.history.lock().await.load().await
    }

    pub fn watch(&self) -> broadcast::Receiver<Event> {
        self.events_tx.subscribe()
    }

    pub fn patterns(&self) -> Vec<ErrorPattern> {
        self.patterns.lock().clone()
    }

    pub fn add_pattern(&self, pattern: ErrorPattern) {
        let mut patterns = self.patterns.lock();
        patterns.retain(|p| p.id != pattern.id);
        patterns.push(pattern);
    }

    pub fn remove_pattern(&self, id: &str) -> bool {
        let mut patterns = self.patterns.lock();
        let before = patterns.len();
        patterns.retain(|p| p.id != id);
        patterns.len() != before
    }

    pub async fn history(&self) -> Vec<RecoveryAttempt> {
        self.history.lock().await.attempts().to_vec()
    }

    pub async fn stats(&self) -> crate::history::RecoveryStats {
        self.history.lock().await.stats()
    }

    /// Starts the two tap tasks. Calling this twice replaces the previous
    /// taps.
    pub fn start(self: &Arc<Self>, supervisor: Supervisor, health_events: broadcast::Receiver<Event>) {
        let logs = supervisor.watch_logs();
        let log_task = {
            let this = self.clone();
            tokio::spawn(async move { this.run_log_tap(logs).await })
        };
        let health_task = {
            let this = self.clone();
            tokio::spawn(async move { this.run_health_tap(health_events).await })
        };

        let mut tasks = self.tasks.lock();
        for old in tasks.drain(..) {
            old.abort();
        }
        tasks.push(log_task);
        tasks.push(health_task);
    }

    pub fn stop(&self) {
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
    }

    async fn run_log_tap(self: Arc<Self>, mut logs: broadcast::Receiver<LogLine>) {
        loop {
            let line = match logs.recv().await {
                Ok(line) => line,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            };
            self.evaluate_line(&line.app_id, Some(&line.process_id.clone()), &line.line.line).await;
        }
    }

    async fn run_health_tap(self: Arc<Self>, mut events: broadcast::Receiver<Event>) {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            };
            let Event::AppUnhealthy { app_id, .. } = &event else { continue };
            self.evaluate_line(app_id, None, "app_unhealthy").await;
        }
    }

    async fn evaluate_line(&self, app_id: &AppId, process_id: Option<&pinokio_core::ProcessId>, line: &str) {
        let matched: Vec<ErrorPattern> = self.patterns.lock().iter().filter(|p| p.matches(line)).cloned().collect();
        for pattern in matched {
            self.fire(app_id, process_id, &pattern).await;
        }
    }

    async fn fire(&self, app_id: &AppId, process_id: Option<&pinokio_core::ProcessId>, pattern: &ErrorPattern) {
        let now = Utc::now();
        {
            let history = self.history.lock().await;
            if history.in_cooldown(&pattern.id, pattern.cooldown, now) {
                return;
            }
            if history.attempts_in_window(&pattern.id, now) >= pattern.max_attempts {
                tracing::warn!(pattern_id = %pattern.id, app_id = %app_id, "recovery pattern exhausted its attempt budget");
                return;
            }
        }

        let action_ctx = self.ctx.for_subject(Some(app_id.clone()), process_id.cloned());
        let mut succeeded = false;
        let mut last_action = String::new();
        for candidate in &pattern.actions {
            last_action = candidate.to_string();
            match action::execute(candidate, &action_ctx).await {
                Ok(()) => {
                    succeeded = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!(pattern_id = %pattern.id, action = %candidate, error = %e, "recovery action failed, trying next");
                }
            }
        }

        let attempt = RecoveryAttempt { pattern_id: pattern.id.clone(), app_id: Some(app_id.clone()), action: last_action.parse().unwrap_or(RecoveryAction::RestartApplication), succeeded, at: now };
        if let Err(e) = self.history.lock().await.record(attempt).await {
            tracing::warn!(pattern_id = %pattern.id, error = %e, "failed to persist recovery attempt");
        }

        self.events_tx
            .send(Event::RecoveryAttempted { app_id: app_id.clone(), pattern_id: pattern.id.clone(), action: last_action, succeeded, at: now })
            .ok();
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
