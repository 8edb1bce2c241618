// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Health record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    // Ordered worst-to-best is NOT what we want for "worst status wins"
    // aggregation; see `HealthStatus::worst`, which uses an explicit
    // severity rank rather than derived Ord (Unknown sorts oddly otherwise).
    Healthy,
    Recovering,
    Degraded,
    Unhealthy,
    Critical,
    Unknown,
}

impl HealthStatus {
    /// Severity rank used for "overall status is the worst-severity check
    /// status" aggregation. Higher is worse; `Unknown` is worse
    /// than `Healthy` but better than an active failure, matching intuition
    /// that "no data yet" should not read as perfectly healthy nor as an
    /// active incident.
    fn severity(self) -> u8 {
        match self {
            HealthStatus::Healthy => 0,
            HealthStatus::Recovering => 1,
            HealthStatus::Unknown => 2,
            HealthStatus::Degraded => 3,
            HealthStatus::Unhealthy => 4,
            HealthStatus::Critical => 5,
        }
    }

    pub fn worse(self, other: HealthStatus) -> HealthStatus {
        if self.severity() >= other.severity() {
            self
        } else {
            other
        }
    }

    /// True if `self` is no more severe than `other`. Exposed for callers
    /// that need to reason about monotonicity without re-deriving a rank.
    pub fn severity_le(self, other: HealthStatus) -> bool {
        self.severity() <= other.severity()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckStatus {
    pub status: HealthStatus,
    pub message: String,
    pub last_ok_at: Option<DateTime<Utc>>,
    pub last_fail_at: Option<DateTime<Utc>>,
    pub latency_ms: Option<u64>,
    pub details: serde_json::Value,
}

impl CheckStatus {
    pub fn unknown() -> Self {
        Self {
            status: HealthStatus::Unknown,
            message: String::new(),
            last_ok_at: None,
            last_fail_at: None,
            latency_ms: None,
            details: serde_json::Value::Null,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRecord {
    pub overall: HealthStatus,
    pub checks: HashMap<String, CheckStatus>,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
    pub restart_count: u32,
    pub restart_cap: u32,
    pub auto_restart: bool,
}

impl HealthRecord {
    pub fn new(auto_restart: bool, restart_cap: u32) -> Self {
        Self {
            overall: HealthStatus::Unknown,
            checks: HashMap::new(),
            consecutive_failures: 0,
            consecutive_successes: 0,
            restart_count: 0,
            restart_cap,
            auto_restart,
        }
    }

    /// Aggregates `checks` into an overall status: the worst-severity check
    /// status. Adding a `healthy`
    /// check can never worsen the result; adding an `unhealthy` check can
    /// never improve it, because `worse` is monotone in both arguments.
    pub fn aggregate(&mut self) {
        self.overall = self
            .checks
            .values()
            .map(|c| c.status)
            .fold(HealthStatus::Healthy, HealthStatus::worse);
    }

    /// Promotes `degraded` to `unhealthy` after `failure_threshold`
    /// consecutive failures, and resets after `success_threshold`
    /// consecutive successes.
    pub fn apply_thresholds(&mut self, failure_threshold: u32, success_threshold: u32) {
        if self.overall == HealthStatus::Degraded && self.consecutive_failures >= failure_threshold
        {
            self.overall = HealthStatus::Unhealthy;
        }
        if self.consecutive_successes >= success_threshold
            && matches!(self.overall, HealthStatus::Degraded | HealthStatus::Unhealthy)
        {
            self.overall = HealthStatus::Healthy;
            self.consecutive_failures = 0;
        }
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
