// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The provider capability: "abstracts tunnel providers behind
//! a capability... each provider implementation exclusively owns its child
//! processes/credentials." Every concrete provider in `providers/` spawns
//! and owns its own child process; the manager never touches one directly.

use async_trait::async_trait;
use pinokio_core::{Error, TunnelProvider};
use pinokio_shell::error::ShellError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Credentials and placement hints read from environment/config (spec
/// §4.I: "credentials are read from environment or config and never
/// logged"). Never `Debug`-derived with its fields inline to avoid an
/// accidental log of `auth_token`.
#[derive(Default, Clone)]
pub struct OpenOpts {
    pub auth_token: Option<String>,
    pub subdomain: Option<String>,
    /// Only used by [`TunnelProvider::Custom`]: a command template with
    /// `{{PORT}}` substituted for the local port.
    pub custom_command: Option<String>,
}

impl std::fmt::Debug for OpenOpts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenOpts")
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("subdomain", &self.subdomain)
            .field("custom_command", &self.custom_command)
            .finish()
    }
}

/// A live child process a provider owns, wrapped so the manager can close
/// it without knowing the provider's transport details.
pub struct ProcessHandle {
    cancel: CancellationToken,
    join: Option<JoinHandle<Result<Option<i32>, ShellError>>>,
}

impl ProcessHandle {
    pub fn new(cancel: CancellationToken, join: JoinHandle<Result<Option<i32>, ShellError>>) -> Self {
        Self { cancel, join: Some(join) }
    }

    /// Closing is idempotent and reclaims the child even if it already
    /// exited on its own.
    pub async fn close(&mut self) {
        self.cancel.cancel();
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }

    pub fn has_exited(&self) -> bool {
        self.join.as_ref().map(|j| j.is_finished()).unwrap_or(true)
    }
}

pub struct OpenedTunnel {
    pub url: Option<String>,
    pub auth_required: bool,
    pub handle: ProcessHandle,
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn kind(&self) -> TunnelProvider;
    async fn open(&self, local_port: u16, opts: &OpenOpts) -> Result<OpenedTunnel, Error>;
}
