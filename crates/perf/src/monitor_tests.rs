// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::sample::Sample;
use chrono::Utc;

fn sample_with(cpu_pct: f32) -> Sample {
    Sample {
        t: Utc::now(),
        cpu_pct,
        mem_pct: 0.0,
        mem_used_mb: 0,
        mem_total_mb: 0,
        disk_pct: 0.0,
        disk_used_mb: 0,
        disk_total_mb: 0,
        gpu_pct: None,
        network_bytes_total: 0,
        process_count: 0,
    }
}

#[tokio::test]
async fn crossing_threshold_opens_then_closes_an_alert() {
    let monitor = PerfMonitor::new(None, None, None);
    let mut events = monitor.watch();

    monitor.evaluate(sample_with(90.0)).await;
    assert_eq!(monitor.open_alerts().len(), 1);
    assert!(matches!(events.try_recv().unwrap(), Event::AlertOpened { .. }));

    monitor.evaluate(sample_with(10.0)).await;
    assert!(monitor.open_alerts().is_empty());
    assert!(matches!(events.try_recv().unwrap(), Event::AlertClosed { .. }));
}

#[tokio::test]
async fn below_threshold_never_opens_an_alert() {
    let monitor = PerfMonitor::new(None, None, None);
    monitor.evaluate(sample_with(10.0)).await;
    assert!(monitor.open_alerts().is_empty());
}

#[tokio::test]
async fn no_optional_collaborators_still_opens_alerts() {
    // With cache/supervisor/platform_optimizer all absent, the
    // optimization hooks are no-ops; evaluation still completes and opens
    // the alert.
    let monitor = PerfMonitor::new(None, None, None);
    monitor.evaluate(sample_with(96.0)).await;
    assert_eq!(monitor.open_alerts().len(), 1);
}
