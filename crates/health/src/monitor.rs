// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The health monitor: runs each app's checks on independent
//! schedules, aggregates to an overall status, and — when auto-restart is
//! enabled and the restart budget allows — asks the Supervisor to restart.
//! It never restarts a process directly.
//!
//! Grounded on `oj-engine/runtime/monitor.rs`'s per-subject scheduled-tick
//! shape, generalized from job liveness polling to a weighted multi-check
//! aggregation with promote/reset thresholds.

use crate::checks::{run_check, HealthCheckSpec};
use chrono::Utc;
use parking_lot::Mutex;
use pinokio_core::{AppId, Event, HealthRecord, HealthStatus, ProcessId};
use pinokio_supervisor::Supervisor;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct ScheduledCheck {
    pub name: String,
    pub spec: HealthCheckSpec,
    pub interval: Duration,
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub process_id: ProcessId,
    pub checks: Vec<ScheduledCheck>,
    pub failure_threshold: u32,
    pub success_threshold: u32,
    pub auto_restart: bool,
    pub restart_cap: u32,
}

struct AppMonitor {
    record: Arc<Mutex<HealthRecord>>,
    tasks: Vec<JoinHandle<()>>,
}

impl Drop for AppMonitor {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Owns per-app health state and the scheduled check tasks that maintain it.
pub struct HealthMonitor {
    supervisor: Supervisor,
    apps: Mutex<HashMap<AppId, AppMonitor>>,
    events_tx: broadcast::Sender<Event>,
}

impl HealthMonitor {
    pub fn new(supervisor: Supervisor) -> Self {
        let (events_tx, _) = broadcast::channel(1024);
        Self { supervisor, apps: Mutex::new(HashMap::new()), events_tx }
    }

    pub fn watch(&self) -> broadcast::Receiver<Event> {
        self.events_tx.subscribe()
    }

    pub fn record(&self, app_id: &AppId) -> Option<HealthRecord> {
        self.apps.lock().get(app_id).map(|m| m.record.lock().clone())
    }

    /// Starts one independent tick loop per check in `config`, each
    /// updating the shared `HealthRecord` and re-aggregating on every tick.
    pub fn watch_app(&self, app_id: AppId, config: MonitorConfig) {
        self.stop_app(&app_id);

        let record = Arc::new(Mutex::new(HealthRecord::new(config.auto_restart, config.restart_cap)));
        let mut tasks = Vec::new();

        for check in config.checks.clone() {
            let record = record.clone();
            let supervisor = self.supervisor.clone();
            let events_tx = self.events_tx.clone();
            let app_id = app_id.clone();
            let process_id = config.process_id.clone();
            let failure_threshold = config.failure_threshold;
            let success_threshold = config.success_threshold;
            let restart_cap = config.restart_cap;

            let task = tokio::spawn(async move {
                let mut ticker = tokio::time::interval(check.interval);
                loop {
                    ticker.tick().await;
                    let status = run_check(&check.spec, &supervisor).await;

                    let (before, after, should_restart) = {
                        let mut rec = record.lock();
                        let before = rec.overall;
                        if status.status == HealthStatus::Healthy {
                            rec.consecutive_failures = 0;
                            rec.consecutive_successes += 1;
                        } else {
                            rec.consecutive_successes = 0;
                            rec.consecutive_failures += 1;
                        }
                        rec.checks.insert(check.name.clone(), status);
                        rec.aggregate();
                        rec.apply_thresholds(failure_threshold, success_threshold);
                        let after = rec.overall;

                        let should_restart = after == HealthStatus::Critical
                            && rec.auto_restart
                            && rec.restart_count < restart_cap;
                        if should_restart {
                            rec.restart_count += 1;
                        }
                        (before, after, should_restart)
                    };

                    if before != after {
                        events_tx.send(Event::HealthChanged { app_id: app_id.clone(), from: before, to: after, at: Utc::now() }).ok();
                        if before == HealthStatus::Healthy && after != HealthStatus::Healthy {
                            events_tx.send(Event::AppUnhealthy { app_id: app_id.clone(), at: Utc::now() }).ok();
                        }
                        if before != HealthStatus::Healthy && after == HealthStatus::Healthy {
                            events_tx.send(Event::AppRecovered { app_id: app_id.clone(), at: Utc::now() }).ok();
                        }
                    }

                    if should_restart {
                        events_tx
                            .send(Event::RestartTriggered { app_id: app_id.clone(), process_id: process_id.clone(), at: Utc::now() })
                            .ok();
                        if let Err(e) = supervisor.restart(process_id.clone()).await {
                            tracing::warn!(%app_id, error = %e, "health-triggered restart failed");
                        }
                    }
                }
            });
            tasks.push(task);
        }

        self.apps.lock().insert(app_id, AppMonitor { record, tasks });
    }

    pub fn stop_app(&self, app_id: &AppId) {
        self.apps.lock().remove(app_id);
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
