// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The performance monitor: samples system resources on a fixed cadence,
//! keeps a bounded history, and opens/closes alerts as thresholds are
//! crossed. Runs three advisory optimization hooks when an alert opens;
//! a hook failing never aborts the sampling loop.
//!
//! Grounded on `pinokio-health`'s `HealthMonitor` shape (one ticking task
//! owning shared, lock-guarded state and publishing events on every
//! change), generalized from per-app health checks to a single
//! system-wide sampling loop.

use crate::history::History;
use crate::sample::Collector;
use crate::threshold::{recommendations, MetricKind, DEFAULT_THRESHOLDS};
use chrono::Utc;
use parking_lot::Mutex;
use pinokio_cache::CacheManager;
use pinokio_core::{Alert, AlertId, AlertSeverity, Event};
use pinokio_supervisor::Supervisor;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const IDLE_TRIM_AFTER: Duration = Duration::from_secs(6 * 60 * 60);

/// Hook invoked once per metric that newly crossed into an alerting state.
/// Implementations must not panic; errors are logged and swallowed.
#[async_trait::async_trait]
pub trait PlatformOptimizer: Send + Sync {
    async fn optimize(&self, metric: MetricKind);
}

pub struct PerfMonitor {
    history: Arc<Mutex<History>>,
    open_alerts: Arc<Mutex<HashMap<MetricKind, Alert>>>,
    events_tx: broadcast::Sender<Event>,
    cache: Option<Arc<CacheManager>>,
    supervisor: Option<Supervisor>,
    platform_optimizer: Option<Arc<dyn PlatformOptimizer>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PerfMonitor {
    pub fn new(
        cache: Option<Arc<CacheManager>>,
        supervisor: Option<Supervisor>,
        platform_optimizer: Option<Arc<dyn PlatformOptimizer>>,
    ) -> Arc<Self> {
        let (events_tx, _) = broadcast::channel(1024);
        Arc::new(Self {
            history: Arc::new(Mutex::new(History::new())),
            open_alerts: Arc::new(Mutex::new(HashMap::new())),
            events_tx,
            cache,
            supervisor,
            platform_optimizer,
            task: Mutex::new(None),
        })
    }

    pub fn watch(&self) -> broadcast::Receiver<Event> {
        self.events_tx.subscribe()
    }

    pub fn history(&self) -> Vec<crate::sample::Sample> {
        self.history.lock().all()
    }

    pub fn latest(&self) -> Option<crate::sample::Sample> {
        self.history.lock().latest()
    }

    pub fn open_alerts(&self) -> Vec<Alert> {
        self.open_alerts.lock().values().cloned().collect()
    }

    /// Starts the fixed-cadence sampling loop. Calling this twice replaces
    /// the previous loop.
    pub fn start(self: &Arc<Self>, base_path: PathBuf, cadence: Duration) {
        let this = self.clone();
        let task = tokio::spawn(async move {
            let mut collector = Collector::new(&base_path);
            let mut ticker = tokio::time::interval(cadence);
            loop {
                ticker.tick().await;
                let sample = collector.sample();
                this.history.lock().push(sample);
                this.evaluate(sample).await;
            }
        });
        let mut slot = self.task.lock();
        if let Some(old) = slot.take() {
            old.abort();
        }
        *slot = Some(task);
    }

    pub fn stop(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
    }

    async fn evaluate(&self, sample: crate::sample::Sample) {
        for threshold in DEFAULT_THRESHOLDS {
            let value = match threshold.metric {
                MetricKind::Cpu => sample.cpu_pct as f64,
                MetricKind::Memory => sample.mem_pct as f64,
                MetricKind::Gpu => sample.gpu_pct.map(|v| v as f64).unwrap_or(0.0),
                MetricKind::Disk => sample.disk_pct as f64,
                MetricKind::Processes => sample.process_count as f64,
            };
            if threshold.metric == MetricKind::Gpu && sample.gpu_pct.is_none() {
                continue;
            }

            let crossed = value > threshold.value;
            let already_open = self.open_alerts.lock().contains_key(&threshold.metric);

            if crossed && !already_open {
                self.open_alert(threshold.metric, value, threshold.value, threshold.severity).await;
            } else if !crossed && already_open {
                self.close_alert(threshold.metric);
            }
        }
    }

    async fn open_alert(&self, metric: MetricKind, value: f64, threshold_value: f64, severity: AlertSeverity) {
        let alert = Alert {
            id: AlertId::generate(),
            severity,
            metric: metric.label().to_string(),
            value,
            threshold: threshold_value,
            opened_at: Utc::now(),
            closed_at: None,
            recommendations: recommendations(metric),
        };
        let alert_id = alert.id.clone();
        self.open_alerts.lock().insert(metric, alert);
        self.events_tx.send(Event::AlertOpened { alert_id, metric: metric.label().to_string(), at: Utc::now() }).ok();
        tracing::warn!(metric = metric.label(), value, threshold = threshold_value, "resource threshold crossed");

        self.run_optimizations(metric).await;
    }

    fn close_alert(&self, metric: MetricKind) {
        if let Some(mut alert) = self.open_alerts.lock().remove(&metric) {
            alert.closed_at = Some(Utc::now());
            self.events_tx.send(Event::AlertClosed { alert_id: alert.id, at: Utc::now() }).ok();
        }
    }

    /// Runs the three advisory optimization hooks for `metric`. Every hook
    /// is best-effort: a failure is logged and does not stop the others or
    /// propagate to the sampling loop.
    async fn run_optimizations(&self, metric: MetricKind) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.cleanup().await {
                tracing::warn!(metric = metric.label(), error = %e, "cache cleanup hook failed");
            }
        }

        if let Some(supervisor) = &self.supervisor {
            let trimmed = supervisor.trim_idle(IDLE_TRIM_AFTER).await;
            if trimmed > 0 {
                tracing::info!(metric = metric.label(), trimmed, "idle-process trim hook ran");
            }
        }

        if let Some(optimizer) = &self.platform_optimizer {
            optimizer.optimize(metric).await;
        }
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
