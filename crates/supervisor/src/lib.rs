// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pinokio-supervisor: the process/daemon supervisor. Owns
//! every tracked process and the local TCP port pool exclusively; every
//! other component holds read-only snapshots.

mod command;
mod daemon_spec;
mod port_pool;
mod supervisor;

pub use command::{StartOpts, StopOpts};
pub use daemon_spec::{Backoff, DaemonSpec, RestartPolicy};
pub use port_pool::PortPool;
pub use supervisor::Supervisor;

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod supervisor_tests;
