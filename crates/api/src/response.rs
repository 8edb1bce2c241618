// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon -> client responses.
//!
//! Payloads that mirror a `pinokio_core` record are carried directly.
//! Payloads owned by a crate `pinokio-api` does not depend on (cache
//! stats, perf samples/history, recovery patterns/history) are carried as
//! `serde_json::Value`; the CLI renders them generically in JSON mode and
//! the daemon is the only place that needs their concrete shape.

use crate::request::CacheValueWire;
use pinokio_core::{Alert, AppProfile, AppStateRecord, Error, ErrorKind, Event, ProcessRecord, TunnelRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Response {
    Welcome { protocol_version: u32 },
    Ok,
    ShuttingDown,

    Apps { apps: Vec<AppStateRecord> },
    Profile { profile: AppProfile },
    AppState { state: AppStateRecord },
    Event { event: Event },

    Processes { processes: Vec<ProcessRecord> },
    Process { process: ProcessRecord },

    Tunnel { tunnel: TunnelRecord },
    Tunnels { tunnels: Vec<TunnelRecord> },

    CacheValue { value: Option<CacheValueWire> },
    /// Serialized `pinokio_cache::CacheStats`.
    CacheStats { stats: serde_json::Value },

    /// Serialized `pinokio_perf::Sample`.
    Metrics { sample: serde_json::Value },
    /// Serialized `Vec<pinokio_perf::Sample>`.
    MetricsHistory { samples: serde_json::Value },

    Alerts { alerts: Vec<Alert> },

    /// Serialized `Vec<pinokio_recovery::ErrorPattern>`.
    RecoveryPatterns { patterns: serde_json::Value },
    /// Serialized `pinokio_recovery::RecoveryStats`.
    RecoveryHistory { history: serde_json::Value },

    /// A request failed; carries the same shape as `pinokio_core::Error`
    /// (which is not itself `Serialize`, since its `cause` is a boxed
    /// trait object) so the CLI can recover the right exit code via
    /// `ErrorKind::exit_code`.
    Error { kind: ErrorKind, message: String, code: Option<String> },
}

impl Response {
    pub fn from_error(err: &Error) -> Self {
        Response::Error {
            kind: err.kind,
            message: err.message.clone(),
            code: err.code.map(str::to_string),
        }
    }
}
