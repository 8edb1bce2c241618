// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps every wire `Request` onto the wired-together [`ControlPlane`] and
//! produces the matching `Response`. One function, one big match — grounded
//! on the teacher's `listener::handle_connection` dispatch shape, with the
//! per-connection streaming subscriptions (`AppsEvents`, `ProcessesWatch`)
//! handled by the listener itself rather than here, since only the listener
//! owns the connection's write half.

use crate::control_plane::ControlPlane;
use pinokio_api::request::CacheValueWire;
use pinokio_api::{Request, Response};
use pinokio_core::Error;
use pinokio_recovery::ErrorPattern;
use pinokio_tunnel::OpenOpts;
use tracing::info;

/// Dispatches one request-response pair. Streaming requests
/// (`AppsEvents`/`ProcessesWatch`) are rejected here with a descriptive
/// error; the listener intercepts them before they reach this function.
pub async fn dispatch(request: Request, ctx: &ControlPlane) -> Response {
    match try_dispatch(request, ctx).await {
        Ok(response) => response,
        Err(err) => Response::from_error(&err),
    }
}

async fn try_dispatch(request: Request, ctx: &ControlPlane) -> Result<Response, Error> {
    match request {
        Request::Hello => Ok(Response::Welcome { protocol_version: pinokio_api::PROTOCOL_VERSION }),
        Request::Shutdown => {
            info!("shutdown requested over the wire");
            ctx.shutdown.cancel();
            Ok(Response::ShuttingDown)
        }

        Request::AppsList => Ok(Response::Apps { apps: ctx.list_app_states().await? }),
        Request::AppsAnalyze { app_id } => Ok(Response::Profile { profile: ctx.analyze(&app_id).await? }),
        Request::AppsInstall { app_id, inputs } => Ok(Response::Profile { profile: ctx.install(&app_id, inputs).await? }),
        Request::AppsStart { app_id } => {
            ctx.start(&app_id).await?;
            Ok(Response::Ok)
        }
        Request::AppsStop { app_id, grace_s, force_after_s } => {
            ctx.stop_app(&app_id, grace_s, force_after_s).await?;
            Ok(Response::Ok)
        }
        Request::AppsUninstall { app_id } => {
            ctx.uninstall(&app_id).await?;
            Ok(Response::Ok)
        }
        Request::AppsState { app_id } => {
            let state = ctx.state_store().await.load(&app_id).await?;
            Ok(Response::AppState { state })
        }
        Request::AppsEvents { .. } => Err(streaming_request_error("apps.events")),

        Request::ProcessesList => Ok(Response::Processes { processes: ctx.supervisor.list() }),
        Request::ProcessesGet { process_id } => ctx
            .supervisor
            .get(&process_id)
            .map(|process| Response::Process { process })
            .ok_or_else(|| Error::not_found(format!("no tracked process {process_id}"))),
        Request::ProcessesStop { process_id, grace_s, force_after_s } => {
            let defaults = pinokio_supervisor::StopOpts::default();
            let opts = pinokio_supervisor::StopOpts {
                grace: grace_s.map(std::time::Duration::from_secs).unwrap_or(defaults.grace),
                force_after: force_after_s.map(std::time::Duration::from_secs).unwrap_or(defaults.force_after),
            };
            ctx.supervisor.stop(process_id, opts).await?;
            Ok(Response::Ok)
        }
        Request::ProcessesRestart { process_id } => {
            ctx.supervisor.restart(process_id).await?;
            Ok(Response::Ok)
        }
        Request::ProcessesWatch => Err(streaming_request_error("processes.watch")),

        Request::TunnelsOpen { app_id, local_port, provider, auth_token, subdomain, custom_command } => {
            let opts = OpenOpts { auth_token, subdomain, custom_command };
            let tunnel = ctx.tunnels.open(app_id, provider, local_port, opts).await?;
            Ok(Response::Tunnel { tunnel })
        }
        Request::TunnelsClose { tunnel_id } => {
            ctx.tunnels.close(&tunnel_id).await?;
            Ok(Response::Ok)
        }
        Request::TunnelsList => Ok(Response::Tunnels { tunnels: ctx.tunnels.list().await }),
        Request::TunnelsStatus { tunnel_id } => ctx
            .tunnels
            .status(&tunnel_id)
            .await
            .map(|tunnel| Response::Tunnel { tunnel })
            .ok_or_else(|| Error::not_found(format!("no tunnel {tunnel_id}"))),

        Request::CacheGet { key, kind } => {
            let value = ctx.cache.get(&key, kind).await?.map(to_wire_value);
            Ok(Response::CacheValue { value })
        }
        Request::CachePut { key, kind, value, ttl_s, priority } => {
            let opts = pinokio_cache::PutOpts { ttl_s, priority: Some(priority) };
            ctx.cache.put(key, from_wire_value(value), kind, opts).await?;
            Ok(Response::Ok)
        }
        Request::CacheInvalidate { key } => {
            ctx.cache.invalidate(&key).await?;
            Ok(Response::Ok)
        }
        Request::CacheStats => {
            let stats = serde_json::to_value(ctx.cache.stats()).map_err(Error::corrupt)?;
            Ok(Response::CacheStats { stats })
        }
        Request::CacheCleanup => {
            ctx.cache.cleanup().await?;
            Ok(Response::Ok)
        }

        Request::MetricsCurrent => {
            let sample = serde_json::to_value(ctx.perf.latest()).map_err(Error::corrupt)?;
            Ok(Response::Metrics { sample })
        }
        Request::MetricsHistory { .. } => {
            let samples = serde_json::to_value(ctx.perf.history()).map_err(Error::corrupt)?;
            Ok(Response::MetricsHistory { samples })
        }

        Request::AlertsList => Ok(Response::Alerts { alerts: ctx.perf.open_alerts() }),

        Request::RecoveryPatternsList => {
            let patterns = serde_json::to_value(ctx.recovery.patterns()).map_err(Error::corrupt)?;
            Ok(Response::RecoveryPatterns { patterns })
        }
        Request::RecoveryPatternsAdd { pattern } => {
            let pattern: ErrorPattern = serde_json::from_value(pattern).map_err(|e| Error::invalid_input(format!("malformed recovery pattern: {e}")))?;
            ctx.recovery.add_pattern(pattern);
            Ok(Response::Ok)
        }
        Request::RecoveryPatternsRemove { id } => {
            if ctx.recovery.remove_pattern(&id) {
                Ok(Response::Ok)
            } else {
                Err(Error::not_found(format!("no recovery pattern {id}")))
            }
        }
        Request::RecoveryHistory => {
            let history = serde_json::to_value(ctx.recovery.history().await).map_err(Error::corrupt)?;
            Ok(Response::RecoveryHistory { history })
        }
    }
}

fn streaming_request_error(op: &str) -> Error {
    Error::invalid_input(format!("{op} is a streaming request; the listener must handle it directly"))
}

fn to_wire_value(value: pinokio_cache::CacheValue) -> CacheValueWire {
    match value {
        pinokio_cache::CacheValue::Json(v) => CacheValueWire::Json(v),
        pinokio_cache::CacheValue::Blob(b) => CacheValueWire::Blob(b),
    }
}

fn from_wire_value(value: CacheValueWire) -> pinokio_cache::CacheValue {
    match value {
        CacheValueWire::Json(v) => pinokio_cache::CacheValue::Json(v),
        CacheValueWire::Blob(b) => pinokio_cache::CacheValue::Blob(b),
    }
}
