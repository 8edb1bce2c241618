// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One module per spec §6 RPC subject (`apps`, `processes`, `tunnels`,
//! `cache`, `metrics`/`alerts`, `recovery`), plus `daemon` for the
//! CLI-local process-management commands (start/stop/status/logs) that
//! never cross the wire at all.

pub mod alerts;
pub mod apps;
pub mod cache;
pub mod daemon;
pub mod metrics;
pub mod processes;
pub mod recovery;
pub mod tunnels;
