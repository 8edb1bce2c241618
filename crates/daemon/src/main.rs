// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pinokiod — the control-plane daemon.
//!
//! Background process that owns every app-lifecycle component (spec
//! §4.A-§4.L) and serves the `pinokio` CLI over a Unix socket (spec §6).
//! Not meant to be invoked directly by a human; `pinokio daemon start`
//! spawns it.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;
use pinokio_core::PlatformKind;
use pinokio_daemon::config::Config;
use pinokio_daemon::lifecycle::Daemon;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pinokiod", version, about = "Pinokio control-plane daemon")]
struct Args {
    /// Force platform detection to a specific kind instead of auto-detecting
    /// (colab, vast, lightning, paperspace, runpod).
    #[arg(long)]
    platform_override: Option<PlatformKind>,

    /// Override the detected/overridden platform's base path.
    #[arg(long)]
    base_path: Option<PathBuf>,

    /// Log level filter (passed to `RUST_LOG` semantics if unset).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = Config::load(args.platform_override, args.base_path, args.log_level)?;
    let _log_guard = setup_logging(&config);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting pinokiod");

    let daemon = match Daemon::startup(config).await {
        Ok(daemon) => daemon,
        Err(err) => {
            error!(error = %err, "daemon startup failed");
            return Err(Box::new(err));
        }
    };

    daemon.run().await?;
    Ok(())
}

fn setup_logging(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let parent = config.log_path.parent()?;
    std::fs::create_dir_all(parent).ok()?;

    let file_name = config.log_path.file_name()?;
    let file_appender = tracing_appender::rolling::never(parent, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Some(guard)
}
