// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pinokio tunnels` - spec §6 `tunnels.*` RPC surface.

use crate::client::{ok_or_exit, Client};
use crate::exit_error::ExitError;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand, ValueEnum};
use pinokio_api::{Request, Response};
use pinokio_core::{AppId, TunnelId, TunnelProvider};

#[derive(Args)]
pub struct TunnelsArgs {
    #[command(subcommand)]
    pub command: TunnelsCommand,
}

/// Mirrors `pinokio_core::TunnelProvider` with a `clap::ValueEnum` impl;
/// kept separate rather than deriving `ValueEnum` on the core type so
/// `pinokio-core` stays free of a `clap` dependency.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliTunnelProvider {
    Ngrok,
    Cloudflare,
    Localtunnel,
    Serveo,
    Custom,
}

impl From<CliTunnelProvider> for TunnelProvider {
    fn from(value: CliTunnelProvider) -> Self {
        match value {
            CliTunnelProvider::Ngrok => TunnelProvider::Ngrok,
            CliTunnelProvider::Cloudflare => TunnelProvider::Cloudflare,
            CliTunnelProvider::Localtunnel => TunnelProvider::Localtunnel,
            CliTunnelProvider::Serveo => TunnelProvider::Serveo,
            CliTunnelProvider::Custom => TunnelProvider::Custom,
        }
    }
}

#[derive(Subcommand)]
pub enum TunnelsCommand {
    /// Open a public tunnel to a local port.
    Open {
        app_id: String,
        local_port: u16,
        #[arg(long, value_enum)]
        provider: CliTunnelProvider,
        /// Provider auth token; falls back to the provider's environment
        /// variable (e.g. `NGROK_TOKEN`) when omitted.
        #[arg(long)]
        auth_token: Option<String>,
        #[arg(long)]
        subdomain: Option<String>,
        /// Shell command template for the `custom` provider.
        #[arg(long)]
        custom_command: Option<String>,
    },
    /// Close a tunnel.
    Close { tunnel_id: String },
    /// List every tunnel.
    List,
    /// Print one tunnel's status.
    Status { tunnel_id: String },
}

pub async fn run(client: &Client, format: OutputFormat, args: TunnelsArgs) -> Result<(), ExitError> {
    match args.command {
        TunnelsCommand::Open { app_id, local_port, provider, auth_token, subdomain, custom_command } => {
            let response = ok_or_exit(
                client
                    .call(Request::TunnelsOpen {
                        app_id: AppId::new(app_id),
                        local_port,
                        provider: provider.into(),
                        auth_token,
                        subdomain,
                        custom_command,
                    })
                    .await?,
            )?;
            let Response::Tunnel { tunnel } = response else { return Err(unexpected(response)) };
            output::print_tunnel(&tunnel, format).map_err(render_err)
        }
        TunnelsCommand::Close { tunnel_id } => {
            ok_or_exit(client.call(Request::TunnelsClose { tunnel_id: TunnelId::new(tunnel_id) }).await?)?;
            println!("closed");
            Ok(())
        }
        TunnelsCommand::List => {
            let response = ok_or_exit(client.call(Request::TunnelsList).await?)?;
            let Response::Tunnels { tunnels } = response else { return Err(unexpected(response)) };
            output::print_tunnels(&tunnels, format).map_err(render_err)
        }
        TunnelsCommand::Status { tunnel_id } => {
            let response = ok_or_exit(client.call(Request::TunnelsStatus { tunnel_id: TunnelId::new(tunnel_id) }).await?)?;
            let Response::Tunnel { tunnel } = response else { return Err(unexpected(response)) };
            output::print_tunnel(&tunnel, format).map_err(render_err)
        }
    }
}

fn unexpected(response: Response) -> ExitError {
    ExitError::new(1, format!("daemon returned an unexpected response: {response:?}"))
}

fn render_err(e: anyhow::Error) -> ExitError {
    ExitError::new(1, e.to_string())
}
