// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Default resource thresholds and the metrics they gate.

use pinokio_core::AlertSeverity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Cpu,
    Memory,
    Gpu,
    Disk,
    Processes,
}

impl MetricKind {
    pub fn label(self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu_pct",
            MetricKind::Memory => "mem_pct",
            MetricKind::Gpu => "gpu_pct",
            MetricKind::Disk => "disk_pct",
            MetricKind::Processes => "process_count",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Threshold {
    pub metric: MetricKind,
    pub value: f64,
    pub severity: AlertSeverity,
}

/// CPU>85 high, mem>90 critical, gpu>95 high, disk>90 critical,
/// processes>200 medium.
pub const DEFAULT_THRESHOLDS: &[Threshold] = &[
    Threshold { metric: MetricKind::Cpu, value: 85.0, severity: AlertSeverity::High },
    Threshold { metric: MetricKind::Memory, value: 90.0, severity: AlertSeverity::Critical },
    Threshold { metric: MetricKind::Gpu, value: 95.0, severity: AlertSeverity::High },
    Threshold { metric: MetricKind::Disk, value: 90.0, severity: AlertSeverity::Critical },
    Threshold { metric: MetricKind::Processes, value: 200.0, severity: AlertSeverity::Medium },
];

pub fn recommendations(metric: MetricKind) -> Vec<String> {
    match metric {
        MetricKind::Cpu => vec![
            "check for runaway processes".to_string(),
            "consider trimming idle applications".to_string(),
        ],
        MetricKind::Memory => vec![
            "clear unused caches".to_string(),
            "restart memory-heavy applications".to_string(),
        ],
        MetricKind::Gpu => vec!["reduce concurrent GPU workloads".to_string()],
        MetricKind::Disk => vec![
            "clear the disk cache layer".to_string(),
            "remove unused model blobs".to_string(),
        ],
        MetricKind::Processes => vec!["trim idle background processes".to_string()],
    }
}
