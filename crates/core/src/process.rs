// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process record. The Supervisor exclusively owns process
//! records; every other component holds read-only snapshots.

use crate::{AppId, ProcessId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Starting,
    Running,
    Stopping,
    Exited,
    Zombie,
    Lost,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: ProcessId,
    pub app_id: AppId,
    pub group_id: u32,
    pub command: Vec<String>,
    pub workdir: std::path::PathBuf,
    pub env: HashMap<String, String>,
    pub started_at: DateTime<Utc>,
    pub status: ProcessStatus,
    pub ports_owned: Vec<u16>,
    pub last_exit_code: Option<i32>,
    pub restart_count: u32,
    pub restart_budget: u32,
}

impl ProcessRecord {
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, ProcessStatus::Exited | ProcessStatus::Lost)
    }
}
