// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pinokio apps` - spec §6 `apps.*` RPC surface.

use crate::client::{ok_or_exit, Client};
use crate::exit_error::ExitError;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use pinokio_api::{read_response, Request, Response};
use pinokio_core::AppId;

#[derive(Args)]
pub struct AppsArgs {
    #[command(subcommand)]
    pub command: AppsCommand,
}

#[derive(Subcommand)]
pub enum AppsCommand {
    /// List every app the control plane knows about.
    List,
    /// Analyze an app's source tree and cache its profile.
    Analyze { app_id: String },
    /// Install an app, optionally supplying typed form inputs as `key=value` pairs.
    Install {
        app_id: String,
        /// Repeatable `key=value` input for the installer's typed form. The
        /// value is parsed as JSON when possible (`true`, `42`, `"str"`,
        /// `{...}`), else carried as a JSON string.
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
    /// Start an installed app's process.
    Start { app_id: String },
    /// Stop a running app's process.
    Stop {
        app_id: String,
        /// Seconds to wait after the soft signal before escalating to a kill.
        #[arg(long)]
        grace: Option<u64>,
        /// Seconds after which a still-running process is force-killed.
        #[arg(long)]
        force_after: Option<u64>,
    },
    /// Uninstall an app (stops it first if running).
    Uninstall { app_id: String },
    /// Print an app's persisted state record.
    State { app_id: String },
    /// Stream lifecycle events for one app, or every app if omitted.
    Events { app_id: Option<String> },
}

pub async fn run(client: &Client, format: OutputFormat, args: AppsArgs) -> Result<(), ExitError> {
    match args.command {
        AppsCommand::List => {
            let response = ok_or_exit(client.call(Request::AppsList).await?)?;
            let Response::Apps { apps } = response else { return Err(unexpected(response)) };
            output::print_apps(&apps, format).map_err(render_err)
        }
        AppsCommand::Analyze { app_id } => {
            let response = ok_or_exit(client.call(Request::AppsAnalyze { app_id: AppId::new(app_id) }).await?)?;
            let Response::Profile { profile } = response else { return Err(unexpected(response)) };
            output::print_profile(&profile, format).map_err(render_err)
        }
        AppsCommand::Install { app_id, set } => {
            let inputs = build_inputs(&set)?;
            let response = ok_or_exit(client.call(Request::AppsInstall { app_id: AppId::new(app_id), inputs }).await?)?;
            let Response::Profile { profile } = response else { return Err(unexpected(response)) };
            output::print_profile(&profile, format).map_err(render_err)
        }
        AppsCommand::Start { app_id } => {
            ok_or_exit(client.call(Request::AppsStart { app_id: AppId::new(app_id) }).await?)?;
            println!("started");
            Ok(())
        }
        AppsCommand::Stop { app_id, grace, force_after } => {
            ok_or_exit(
                client
                    .call(Request::AppsStop { app_id: AppId::new(app_id), grace_s: grace, force_after_s: force_after })
                    .await?,
            )?;
            println!("stopped");
            Ok(())
        }
        AppsCommand::Uninstall { app_id } => {
            ok_or_exit(client.call(Request::AppsUninstall { app_id: AppId::new(app_id) }).await?)?;
            println!("uninstalled");
            Ok(())
        }
        AppsCommand::State { app_id } => {
            let response = ok_or_exit(client.call(Request::AppsState { app_id: AppId::new(app_id) }).await?)?;
            let Response::AppState { state } = response else { return Err(unexpected(response)) };
            output::print_app_state(&state, format).map_err(render_err)
        }
        AppsCommand::Events { app_id } => {
            let mut stream = client.watch(Request::AppsEvents { app_id: app_id.map(AppId::new) }).await?;
            loop {
                let response = read_response(&mut stream).await.map_err(ExitError::unreachable_daemon)?;
                match response {
                    Response::Event { event } => output::print_event(&event, format).map_err(render_err)?,
                    other => return Err(unexpected(other)),
                }
            }
        }
    }
}

/// Parses repeated `--set key=value` flags into the `serde_json::Value`
/// object the wire's `AppsInstall.inputs` carries. Values parse as JSON
/// when possible so `--set headless=true` and `--set workers=4` produce
/// `bool`/`number`, falling back to a plain string otherwise.
fn build_inputs(set: &[String]) -> Result<serde_json::Value, ExitError> {
    let mut map = serde_json::Map::new();
    for entry in set {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| ExitError::new(2, format!("--set expects key=value, got `{entry}`")))?;
        let parsed = serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
        map.insert(key.to_string(), parsed);
    }
    Ok(serde_json::Value::Object(map))
}

fn unexpected(response: Response) -> ExitError {
    ExitError::new(1, format!("daemon returned an unexpected response: {response:?}"))
}

fn render_err(e: anyhow::Error) -> ExitError {
    ExitError::new(1, e.to_string())
}
