// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-component events.
//!
//! Components communicate exclusively through commands and events over
//! bounded channels. This enum is
//! the wire shape carried on those channels and re-exported through the
//! control-plane API's lazy `apps.events`/`processes.watch` streams.

use crate::{AlertId, AppId, HealthStatus, ProcessId, TunnelId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    AppStateChanged { app_id: AppId, from: crate::AppState, to: crate::AppState, at: DateTime<Utc> },
    InstallProgress { app_id: AppId, phase: String, message: String, pct: Option<u8>, at: DateTime<Utc> },
    ProcessStarted { process_id: ProcessId, app_id: AppId, at: DateTime<Utc> },
    ProcessExited { process_id: ProcessId, app_id: AppId, exit_code: Option<i32>, at: DateTime<Utc> },
    RestartCapReached { app_id: AppId, process_id: ProcessId, at: DateTime<Utc> },
    HealthChanged { app_id: AppId, from: HealthStatus, to: HealthStatus, at: DateTime<Utc> },
    AppUnhealthy { app_id: AppId, at: DateTime<Utc> },
    AppRecovered { app_id: AppId, at: DateTime<Utc> },
    RestartTriggered { app_id: AppId, process_id: ProcessId, at: DateTime<Utc> },
    TunnelOpened { tunnel_id: TunnelId, app_id: AppId, url: Option<String>, at: DateTime<Utc> },
    TunnelClosed { tunnel_id: TunnelId, at: DateTime<Utc> },
    CacheInvalidated { key: crate::CacheKey, at: DateTime<Utc> },
    AlertOpened { alert_id: AlertId, metric: String, at: DateTime<Utc> },
    AlertClosed { alert_id: AlertId, at: DateTime<Utc> },
    RecoveryAttempted { app_id: AppId, pattern_id: String, action: String, succeeded: bool, at: DateTime<Utc> },
}

impl Event {
    pub fn app_id(&self) -> Option<&AppId> {
        match self {
            Event::AppStateChanged { app_id, .. }
            | Event::InstallProgress { app_id, .. }
            | Event::ProcessStarted { app_id, .. }
            | Event::ProcessExited { app_id, .. }
            | Event::RestartCapReached { app_id, .. }
            | Event::HealthChanged { app_id, .. }
            | Event::AppUnhealthy { app_id, .. }
            | Event::AppRecovered { app_id, .. }
            | Event::RestartTriggered { app_id, .. }
            | Event::TunnelOpened { app_id, .. }
            | Event::RecoveryAttempted { app_id, .. } => Some(app_id),
            Event::TunnelClosed { .. } | Event::CacheInvalidated { .. } | Event::AlertOpened { .. } | Event::AlertClosed { .. } => None,
        }
    }
}
