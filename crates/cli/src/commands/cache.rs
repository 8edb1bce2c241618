// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pinokio cache` - spec §6 `cache.*` RPC surface.

use crate::client::{ok_or_exit, Client};
use crate::exit_error::ExitError;
use crate::output::OutputFormat;
use clap::{Args, Subcommand, ValueEnum};
use pinokio_api::{CacheValueWire, Request, Response};
use pinokio_core::{CacheKey, CacheKind};

#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

/// Mirrors `pinokio_core::CacheKind` with a `clap::ValueEnum` impl, kept
/// separate for the same reason as `tunnels::CliTunnelProvider`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliCacheKind {
    AppMetadata,
    ModelBlob,
    DepInfo,
    InstallState,
    ProcessInfo,
    TunnelConfig,
    PlatformConfig,
    UserPrefs,
}

impl From<CliCacheKind> for CacheKind {
    fn from(value: CliCacheKind) -> Self {
        match value {
            CliCacheKind::AppMetadata => CacheKind::AppMetadata,
            CliCacheKind::ModelBlob => CacheKind::ModelBlob,
            CliCacheKind::DepInfo => CacheKind::DepInfo,
            CliCacheKind::InstallState => CacheKind::InstallState,
            CliCacheKind::ProcessInfo => CacheKind::ProcessInfo,
            CliCacheKind::TunnelConfig => CacheKind::TunnelConfig,
            CliCacheKind::PlatformConfig => CacheKind::PlatformConfig,
            CliCacheKind::UserPrefs => CacheKind::UserPrefs,
        }
    }
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Fetch a cache entry's value.
    Get {
        key: String,
        #[arg(long, value_enum)]
        kind: CliCacheKind,
    },
    /// Store a JSON document under a cache key.
    Put {
        key: String,
        #[arg(long, value_enum)]
        kind: CliCacheKind,
        /// JSON document to store.
        #[arg(long)]
        value: String,
        #[arg(long)]
        ttl: Option<u64>,
        #[arg(long, default_value_t = 3)]
        priority: u8,
    },
    /// Invalidate a cache entry regardless of layer.
    Invalidate { key: String },
    /// Print aggregate cache statistics.
    Stats,
    /// Run an out-of-band expired-entry/disk-cap cleanup pass.
    Cleanup,
}

pub async fn run(client: &Client, format: OutputFormat, args: CacheArgs) -> Result<(), ExitError> {
    match args.command {
        CacheCommand::Get { key, kind } => {
            let response = ok_or_exit(client.call(Request::CacheGet { key: CacheKey::new(key), kind: kind.into() }).await?)?;
            let Response::CacheValue { value } = response else { return Err(unexpected(response)) };
            match value {
                Some(CacheValueWire::Json(v)) => format.print_json_value("value", &v).map_err(render_err),
                Some(CacheValueWire::Blob(b)) => {
                    println!("<blob: {} bytes>", b.len());
                    Ok(())
                }
                None => {
                    println!("<miss>");
                    Ok(())
                }
            }
        }
        CacheCommand::Put { key, kind, value, ttl, priority } => {
            let value: serde_json::Value = serde_json::from_str(&value).map_err(|e| ExitError::new(2, format!("invalid --value payload: {e}")))?;
            ok_or_exit(
                client
                    .call(Request::CachePut {
                        key: CacheKey::new(key),
                        kind: kind.into(),
                        value: CacheValueWire::Json(value),
                        ttl_s: ttl,
                        priority,
                    })
                    .await?,
            )?;
            println!("stored");
            Ok(())
        }
        CacheCommand::Invalidate { key } => {
            let response = ok_or_exit(client.call(Request::CacheInvalidate { key: CacheKey::new(key) }).await?)?;
            match response {
                Response::Ok => {
                    println!("invalidated");
                    Ok(())
                }
                other => Err(unexpected(other)),
            }
        }
        CacheCommand::Stats => {
            let response = ok_or_exit(client.call(Request::CacheStats).await?)?;
            let Response::CacheStats { stats } = response else { return Err(unexpected(response)) };
            format.print_json_value("cache stats", &stats).map_err(render_err)
        }
        CacheCommand::Cleanup => {
            ok_or_exit(client.call(Request::CacheCleanup).await?)?;
            println!("cleaned up");
            Ok(())
        }
    }
}

fn unexpected(response: Response) -> ExitError {
    ExitError::new(1, format!("daemon returned an unexpected response: {response:?}"))
}

fn render_err(e: anyhow::Error) -> ExitError {
    ExitError::new(1, e.to_string())
}
