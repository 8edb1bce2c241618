// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pinokio daemon` - process management for `pinokiod`. Unlike every other
//! subcommand, these never cross the wire: `start` spawns the binary
//! (or runs it in the foreground) before a socket exists to connect to,
//! and `status`/`logs` read the daemon's own PID/log files directly.

use crate::client::Client;
use crate::exit_error::ExitError;
use pinokio_api::Request;
use pinokio_daemon::config::Config;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::process::Command;

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start pinokiod in the background (or foreground with `--foreground`).
    Start {
        #[arg(long)]
        foreground: bool,
    },
    /// Request a graceful shutdown of a running pinokiod.
    Stop,
    /// Report whether pinokiod is reachable.
    Status,
    /// Print the tail of pinokiod's log file.
    Logs {
        #[arg(short = 'n', long, default_value_t = 200)]
        lines: usize,
    },
}

pub async fn run(client: &Client, config: &Config, args: DaemonArgs) -> Result<(), ExitError> {
    match args.command {
        DaemonCommand::Start { foreground } => start(config, foreground).await,
        DaemonCommand::Stop => stop(client).await,
        DaemonCommand::Status => status(client).await,
        DaemonCommand::Logs { lines } => logs(config, lines),
    }
}

async fn start(config: &Config, foreground: bool) -> Result<(), ExitError> {
    if tokio::net::UnixStream::connect(&config.socket_path).await.is_ok() {
        println!("pinokiod already running ({})", config.socket_path.display());
        return Ok(());
    }

    let binary = find_pinokiod_binary()?;
    if foreground {
        let status = daemon_command(&binary, config)
            .status()
            .map_err(|e| ExitError::new(1, format!("failed to run {}: {e}", binary.display())))?;
        if !status.success() {
            return Err(ExitError::new(1, format!("pinokiod exited with {status}")));
        }
        return Ok(());
    }

    daemon_command(&binary, config)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ExitError::new(1, format!("failed to spawn {}: {e}", binary.display())))?;
    println!("pinokiod started");
    Ok(())
}

/// Forwards the CLI's own resolved platform overrides through to the
/// spawned `pinokiod`, which resolves its own `Config` independently and
/// otherwise wouldn't see them (`--base-path`/`--platform-override` are
/// read by `pinokio`'s `Config::load` purely to size this command's own
/// process tree, not inherited via the environment).
fn daemon_command(binary: &PathBuf, config: &Config) -> Command {
    let mut command = Command::new(binary);
    command.arg("--log-level").arg(&config.log_level);
    if let Some(kind) = config.platform_override {
        command.arg("--platform-override").arg(kind.as_str());
    }
    if let Some(base_path) = &config.base_path_override {
        command.arg("--base-path").arg(base_path);
    }
    command
}

async fn stop(client: &Client) -> Result<(), ExitError> {
    match client.call(Request::Shutdown).await {
        Ok(_) => {
            println!("pinokiod stopping");
            Ok(())
        }
        Err(_) => {
            println!("pinokiod not running");
            Ok(())
        }
    }
}

async fn status(client: &Client) -> Result<(), ExitError> {
    match client.call(Request::Hello).await {
        Ok(_) => {
            println!("status: running");
            Ok(())
        }
        Err(_) => {
            println!("status: not running");
            Ok(())
        }
    }
}

fn logs(config: &Config, lines: usize) -> Result<(), ExitError> {
    if !config.log_path.exists() {
        println!("no log file at {}", config.log_path.display());
        return Ok(());
    }
    let content = std::fs::read_to_string(&config.log_path).map_err(|e| ExitError::new(1, e.to_string()))?;
    for line in content.lines().rev().take(lines).collect::<Vec<_>>().into_iter().rev() {
        println!("{line}");
    }
    Ok(())
}

/// Locates the `pinokiod` binary alongside the running `pinokio` binary,
/// falling back to the debug build directory during development.
fn find_pinokiod_binary() -> Result<PathBuf, ExitError> {
    let current_exe = std::env::current_exe().ok();
    if let Some(dir) = current_exe.as_ref().and_then(|p| p.parent()) {
        let candidate = dir.join("pinokiod");
        if candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(ExitError::new(1, "could not locate the pinokiod binary next to pinokio; build it first"))
}
