// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pinokio processes` - spec §6 `processes.*` RPC surface.

use crate::client::{ok_or_exit, Client};
use crate::exit_error::ExitError;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use pinokio_api::{read_response, Request, Response};
use pinokio_core::ProcessId;

#[derive(Args)]
pub struct ProcessesArgs {
    #[command(subcommand)]
    pub command: ProcessesCommand,
}

#[derive(Subcommand)]
pub enum ProcessesCommand {
    /// List every tracked process.
    List,
    /// Print one tracked process.
    Get { process_id: String },
    /// Stop a tracked process.
    Stop {
        process_id: String,
        #[arg(long)]
        grace: Option<u64>,
        #[arg(long)]
        force_after: Option<u64>,
    },
    /// Restart a tracked process with its original command.
    Restart { process_id: String },
    /// Stream process lifecycle events.
    Watch,
}

pub async fn run(client: &Client, format: OutputFormat, args: ProcessesArgs) -> Result<(), ExitError> {
    match args.command {
        ProcessesCommand::List => {
            let response = ok_or_exit(client.call(Request::ProcessesList).await?)?;
            let Response::Processes { processes } = response else { return Err(unexpected(response)) };
            output::print_processes(&processes, format).map_err(render_err)
        }
        ProcessesCommand::Get { process_id } => {
            let response = ok_or_exit(client.call(Request::ProcessesGet { process_id: ProcessId::new(process_id) }).await?)?;
            let Response::Process { process } = response else { return Err(unexpected(response)) };
            output::print_process(&process, format).map_err(render_err)
        }
        ProcessesCommand::Stop { process_id, grace, force_after } => {
            ok_or_exit(
                client
                    .call(Request::ProcessesStop { process_id: ProcessId::new(process_id), grace_s: grace, force_after_s: force_after })
                    .await?,
            )?;
            println!("stopped");
            Ok(())
        }
        ProcessesCommand::Restart { process_id } => {
            ok_or_exit(client.call(Request::ProcessesRestart { process_id: ProcessId::new(process_id) }).await?)?;
            println!("restarted");
            Ok(())
        }
        ProcessesCommand::Watch => {
            let mut stream = client.watch(Request::ProcessesWatch).await?;
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

fn unexpected(response: Response) -> ExitError {
    ExitError::new(1, format!("daemon returned an unexpected response: {response:?}"))
}

fn render_err(e: anyhow::Error) -> ExitError {
    ExitError::new(1, e.to_string())
}
