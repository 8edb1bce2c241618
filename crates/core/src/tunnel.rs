// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tunnel record and analytics.

use crate::TunnelId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TunnelProvider {
    Ngrok,
    Cloudflare,
    Localtunnel,
    Serveo,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TunnelStatus {
    Pending,
    Active,
    Degraded,
    Closed,
    Failed,
}

impl TunnelStatus {
    /// Ordering guarantee: `Open` followed by `Status` returns a status
    /// >= `pending`. Encodes the partial order used to check that.
    fn rank(self) -> u8 {
        match self {
            TunnelStatus::Pending => 0,
            TunnelStatus::Degraded => 1,
            TunnelStatus::Active => 2,
            TunnelStatus::Failed => 3,
            TunnelStatus::Closed => 4,
        }
    }

    pub fn at_least_pending(self) -> bool {
        self.rank() >= TunnelStatus::Pending.rank()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TunnelMetrics {
    pub requests: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub rtt_ema_ms: f64,
}

impl TunnelMetrics {
    /// Exponential moving average update for RTT (`rtt_ema_ms`). `alpha`
    /// weights the newest sample.
    pub fn record_rtt(&mut self, sample_ms: f64, alpha: f64) {
        if self.requests == 0 {
            self.rtt_ema_ms = sample_ms;
        } else {
            self.rtt_ema_ms = alpha * sample_ms + (1.0 - alpha) * self.rtt_ema_ms;
        }
        self.requests += 1;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TunnelRecord {
    pub id: TunnelId,
    pub provider: TunnelProvider,
    pub local_port: u16,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_health_at: Option<DateTime<Utc>>,
    pub status: TunnelStatus,
    pub auth_required: bool,
    pub metrics: TunnelMetrics,
}
