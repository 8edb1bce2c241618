// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pinokio recovery` - spec §6 `recovery.patterns.*` / `recovery.history()`.

use crate::client::{ok_or_exit, Client};
use crate::exit_error::ExitError;
use crate::output::OutputFormat;
use clap::{Args, Subcommand};
use pinokio_api::{Request, Response};

#[derive(Args)]
pub struct RecoveryArgs {
    #[command(subcommand)]
    pub command: RecoveryCommand,
}

#[derive(Subcommand)]
pub enum RecoveryCommand {
    /// List configured recovery patterns.
    PatternsList,
    /// Add a recovery pattern from a JSON document (see spec §4.L's
    /// `ErrorPattern` shape: `id`, `name`, `category`, `severity`,
    /// `regexes`, `keywords`, `actions`, `max_attempts`, `cooldown`).
    PatternsAdd {
        /// JSON-encoded `ErrorPattern`.
        #[arg(long)]
        value: String,
    },
    /// Remove a recovery pattern by id.
    PatternsRemove { id: String },
    /// Print recent recovery attempts and their outcomes.
    History,
}

pub async fn run(client: &Client, format: OutputFormat, args: RecoveryArgs) -> Result<(), ExitError> {
    match args.command {
        RecoveryCommand::PatternsList => {
            let response = ok_or_exit(client.call(Request::RecoveryPatternsList).await?)?;
            let Response::RecoveryPatterns { patterns } = response else { return Err(unexpected(response)) };
            format.print_json_value("recovery patterns", &patterns).map_err(render_err)
        }
        RecoveryCommand::PatternsAdd { value } => {
            let pattern: serde_json::Value = serde_json::from_str(&value).map_err(|e| ExitError::new(2, format!("invalid --value payload: {e}")))?;
            ok_or_exit(client.call(Request::RecoveryPatternsAdd { pattern }).await?)?;
            println!("added");
            Ok(())
        }
        RecoveryCommand::PatternsRemove { id } => {
            ok_or_exit(client.call(Request::RecoveryPatternsRemove { id }).await?)?;
            println!("removed");
            Ok(())
        }
        RecoveryCommand::History => {
            let response = ok_or_exit(client.call(Request::RecoveryHistory).await?)?;
            let Response::RecoveryHistory { history } = response else { return Err(unexpected(response)) };
            format.print_json_value("recovery history", &history).map_err(render_err)
        }
    }
}

fn unexpected(response: Response) -> ExitError {
    ExitError::new(1, format!("daemon returned an unexpected response: {response:?}"))
}

fn render_err(e: anyhow::Error) -> ExitError {
    ExitError::new(1, e.to_string())
}
