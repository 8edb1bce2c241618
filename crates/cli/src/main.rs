// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pinokio` — the control-plane CLI (spec §6). A thin client over
//! `pinokiod`'s Unix-socket RPC surface: every subcommand below maps onto
//! one `pinokio_api::Request` variant and renders the matching `Response`
//! in text or JSON (`--json`).

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod color;
mod commands;
mod exit_error;
mod output;

use clap::Parser;
use client::Client;
use exit_error::ExitError;
use output::OutputFormat;
use pinokio_core::PlatformKind;
use pinokio_daemon::config::Config;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pinokio", version = env!("CARGO_PKG_VERSION"), about = "PinokioCloud control-plane CLI", styles = color::styles())]
struct Cli {
    /// Emit machine-readable JSON instead of text tables.
    #[arg(long, global = true)]
    json: bool,

    /// Override the detected platform when starting the daemon.
    #[arg(long, global = true)]
    platform_override: Option<PlatformKind>,

    /// Override the resolved platform base path when starting the daemon.
    #[arg(long, global = true)]
    base_path: Option<PathBuf>,

    /// Log level for this CLI invocation's own diagnostics (stderr only).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: TopLevel,
}

#[derive(clap::Subcommand)]
enum TopLevel {
    Apps(commands::apps::AppsArgs),
    Processes(commands::processes::ProcessesArgs),
    Tunnels(commands::tunnels::TunnelsArgs),
    Cache(commands::cache::CacheArgs),
    Metrics(commands::metrics::MetricsArgs),
    Alerts(commands::alerts::AlertsArgs),
    Recovery(commands::recovery::RecoveryArgs),
    Daemon(commands::daemon::DaemonArgs),
}

fn main() {
    let cli = Cli::parse();
    let format = if cli.json { OutputFormat::Json } else { OutputFormat::Text };

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            let err = ExitError::new(1, format!("failed to start tokio runtime: {err}"));
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    };
    let result = runtime.block_on(dispatch(cli, format));

    match result {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

async fn dispatch(cli: Cli, format: OutputFormat) -> Result<(), ExitError> {
    let config = Config::load(cli.platform_override, cli.base_path, cli.log_level)
        .map_err(|e| ExitError::new(1, e.to_string()))?;
    let client = Client::new(config.socket_path.clone());

    match cli.command {
        TopLevel::Apps(args) => commands::apps::run(&client, format, args).await,
        TopLevel::Processes(args) => commands::processes::run(&client, format, args).await,
        TopLevel::Tunnels(args) => commands::tunnels::run(&client, format, args).await,
        TopLevel::Cache(args) => commands::cache::run(&client, format, args).await,
        TopLevel::Metrics(args) => commands::metrics::run(&client, format, args).await,
        TopLevel::Alerts(args) => commands::alerts::run(&client, format, args).await,
        TopLevel::Recovery(args) => commands::recovery::run(&client, format, args).await,
        TopLevel::Daemon(args) => commands::daemon::run(&client, &config, args).await,
    }
}
