// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom provider: runs an operator-supplied command template
//! (`opts.custom_command`, `{{PORT}}` substituted) and reports no URL of
//! its own — callers of a custom tunnel are expected to already know the
//! public address (e.g. a pre-configured reverse proxy).

use crate::provider::{OpenOpts, OpenedTunnel, Provider};
use async_trait::async_trait;
use pinokio_core::{Error, ErrorKind, TunnelProvider};
use pinokio_shell::exec::{self, ExecOptions};
use tokio_util::sync::CancellationToken;

pub struct CustomProvider;

#[async_trait]
impl Provider for CustomProvider {
    fn kind(&self) -> TunnelProvider {
        TunnelProvider::Custom
    }

    async fn open(&self, local_port: u16, opts: &OpenOpts) -> Result<OpenedTunnel, Error> {
        let template = opts
            .custom_command
            .as_ref()
            .ok_or_else(|| Error::new(ErrorKind::InvalidInput, "custom provider requires custom_command"))?;
        let resolved = template.replace("{{PORT}}", &local_port.to_string());
        let mut parts = resolved.split_whitespace();
        let program = parts.next().ok_or_else(|| Error::invalid_input("empty custom_command"))?.to_string();
        let args: Vec<String> = parts.map(str::to_string).collect();

        let cancel = CancellationToken::new();
        let exec_opts = ExecOptions { kill_tree_on_cancel: true, ..Default::default() };
        let (_rx, _pid, join) = exec::run_streaming(&program, &args, exec_opts, cancel.clone())
            .await
            .map_err(|e| Error::from(e).with_code("tunnel_spawn_failed"))?;

        Ok(OpenedTunnel {
            url: None,
            auth_required: false,
            handle: crate::provider::ProcessHandle::new(cancel, join),
        })
    }
}
