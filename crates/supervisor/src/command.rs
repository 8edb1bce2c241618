// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands accepted by the Supervisor's single writer task. `Exited` and
//! `MarkLost` are internal — emitted by reaper/watchdog tasks, never by API
//! callers.

use crate::daemon_spec::DaemonSpec;
use pinokio_core::{AppId, Error, ProcessId};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Default)]
pub struct StartOpts {
    pub workdir: PathBuf,
    pub env: HashMap<String, String>,
    pub needs_port: bool,
    /// Pin a specific port instead of allocating the lowest free one.
    pub port: Option<u16>,
    pub daemon: Option<DaemonSpec>,
}

#[derive(Debug, Clone, Copy)]
pub struct StopOpts {
    pub grace: Duration,
    pub force_after: Duration,
}

impl Default for StopOpts {
    fn default() -> Self {
        Self { grace: Duration::from_secs(5), force_after: Duration::from_secs(5) }
    }
}

pub(crate) enum Command {
    Start { app_id: AppId, cmd: Vec<String>, opts: StartOpts, reply: oneshot::Sender<Result<ProcessId, Error>> },
    Stop { id: ProcessId, opts: StopOpts, reply: oneshot::Sender<Result<(), Error>> },
    Restart { id: ProcessId, reply: oneshot::Sender<Result<ProcessId, Error>> },
    Exited { id: ProcessId, code: Option<i32> },
    MarkLost { id: ProcessId },
    /// Carries the restart count forward across a `Restart`'s stop+start
    /// pair, since the new `ProcessId` starts life with `restart_count: 0`.
    BumpRestartCount { id: ProcessId, restart_count: u32 },
}
