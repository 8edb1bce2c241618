// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pinokio alerts` - spec §6 `alerts.list()`.

use crate::client::{ok_or_exit, Client};
use crate::exit_error::ExitError;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use pinokio_api::{Request, Response};

#[derive(Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertsCommand,
}

#[derive(Subcommand)]
pub enum AlertsCommand {
    /// List alerts opened by the performance monitor.
    List,
}

pub async fn run(client: &Client, format: OutputFormat, args: AlertsArgs) -> Result<(), ExitError> {
    match args.command {
        AlertsCommand::List => {
            let response = ok_or_exit(client.call(Request::AlertsList).await?)?;
            let Response::Alerts { alerts } = response else {
                return Err(ExitError::new(1, format!("daemon returned an unexpected response: {response:?}")));
            };
            output::print_alerts(&alerts, format).map_err(|e| ExitError::new(1, e.to_string()))
        }
    }
}
