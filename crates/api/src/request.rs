// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client -> daemon requests: the full §6 CLI/RPC surface, one variant per
//! operation the control-plane API (§4.M) exposes.

use pinokio_core::{AppId, CacheKey, CacheKind, ProcessId, TunnelId, TunnelProvider};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Protocol handshake; the daemon answers with `Response::Welcome`.
    Hello,
    /// Graceful daemon shutdown (spec §9 lifecycle).
    Shutdown,

    AppsList,
    AppsAnalyze { app_id: AppId },
    AppsInstall { app_id: AppId, inputs: serde_json::Value },
    AppsStart { app_id: AppId },
    AppsStop { app_id: AppId, grace_s: Option<u64>, force_after_s: Option<u64> },
    AppsUninstall { app_id: AppId },
    AppsState { app_id: AppId },
    /// Subscribe to the app event stream. `app_id: None` subscribes to
    /// every app; the daemon pushes `Response::Event` frames until the
    /// connection closes (no explicit unsubscribe message, per spec §9's
    /// "well-defined end-of-stream" being connection close).
    AppsEvents { app_id: Option<AppId> },

    ProcessesList,
    ProcessesGet { process_id: ProcessId },
    ProcessesStop { process_id: ProcessId, grace_s: Option<u64>, force_after_s: Option<u64> },
    ProcessesRestart { process_id: ProcessId },
    /// Subscribe to process lifecycle events; same streaming shape as
    /// `AppsEvents`.
    ProcessesWatch,

    TunnelsOpen {
        app_id: AppId,
        local_port: u16,
        provider: TunnelProvider,
        auth_token: Option<String>,
        subdomain: Option<String>,
        custom_command: Option<String>,
    },
    TunnelsClose { tunnel_id: TunnelId },
    TunnelsList,
    TunnelsStatus { tunnel_id: TunnelId },

    CacheGet { key: CacheKey, kind: CacheKind },
    CachePut { key: CacheKey, kind: CacheKind, value: CacheValueWire, ttl_s: Option<u64>, priority: u8 },
    CacheInvalidate { key: CacheKey },
    CacheStats,
    CacheCleanup,

    MetricsCurrent,
    MetricsHistory { window_s: Option<u64> },

    AlertsList,

    RecoveryPatternsList,
    RecoveryPatternsAdd { pattern: serde_json::Value },
    RecoveryPatternsRemove { id: String },
    RecoveryHistory,
}

/// Wire mirror of `pinokio_cache::CacheValue`. `pinokio-api` does not
/// depend on `pinokio-cache`, so this enum carries the same two shapes
/// (JSON document or opaque blob) across the wire; the daemon converts it
/// to/from `CacheValue` at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum CacheValueWire {
    Json(serde_json::Value),
    Blob(Vec<u8>),
}
