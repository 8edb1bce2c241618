// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pinokio metrics` - spec §6 `metrics.*` RPC surface.

use crate::client::{ok_or_exit, Client};
use crate::exit_error::ExitError;
use crate::output::OutputFormat;
use clap::{Args, Subcommand};
use pinokio_api::{Request, Response};

#[derive(Args)]
pub struct MetricsArgs {
    #[command(subcommand)]
    pub command: MetricsCommand,
}

#[derive(Subcommand)]
pub enum MetricsCommand {
    /// Print the most recent performance sample.
    Current,
    /// Print the sample history ring buffer, optionally windowed.
    History {
        /// Only return samples from the last N seconds.
        #[arg(long)]
        window: Option<u64>,
    },
}

pub async fn run(client: &Client, format: OutputFormat, args: MetricsArgs) -> Result<(), ExitError> {
    match args.command {
        MetricsCommand::Current => {
            let response = ok_or_exit(client.call(Request::MetricsCurrent).await?)?;
            let Response::Metrics { sample } = response else { return Err(unexpected(response)) };
            format.print_json_value("current sample", &sample).map_err(render_err)
        }
        MetricsCommand::History { window } => {
            let response = ok_or_exit(client.call(Request::MetricsHistory { window_s: window }).await?)?;
            let Response::MetricsHistory { samples } = response else { return Err(unexpected(response)) };
            format.print_json_value("sample history", &samples).map_err(render_err)
        }
    }
}

fn unexpected(response: Response) -> ExitError {
    ExitError::new(1, format!("daemon returned an unexpected response: {response:?}"))
}

fn render_err(e: anyhow::Error) -> ExitError {
    ExitError::new(1, e.to_string())
}
