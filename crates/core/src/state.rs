// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! App state machine:
//! `absent -> analyzing -> needs_deps -> installing -> installed -> starting
//! -> running <-> degraded -> stopping -> installed`, with a terminal
//! `failed` state reachable from any node.

use crate::error::{Error, ErrorKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppState {
    Absent,
    Analyzing,
    NeedsDeps,
    Installing,
    Installed,
    Starting,
    Running,
    Degraded,
    Stopping,
    Failed,
}

impl AppState {
    /// Returns the set of states reachable from `self` in one transition.
    /// `Failed` is reachable from every non-terminal state, so it is
    /// appended separately rather than repeated in every arm.
    pub fn allowed_next(self) -> &'static [AppState] {
        use AppState::*;
        match self {
            Absent => &[Analyzing],
            Analyzing => &[NeedsDeps, Installing],
            NeedsDeps => &[Installing],
            Installing => &[Installed],
            Installed => &[Starting],
            Starting => &[Running],
            Running => &[Degraded, Stopping],
            Degraded => &[Running, Stopping],
            Stopping => &[Installed],
            Failed => &[Analyzing],
        }
    }

    /// Validates a proposed transition. `Failed` is always a legal target
    /// from any non-terminal state.
    pub fn validate_transition(self, next: AppState) -> Result<(), Error> {
        if next == AppState::Failed {
            return Ok(());
        }
        if self.allowed_next().contains(&next) {
            return Ok(());
        }
        Err(Error::new(
            ErrorKind::Precondition,
            format!("illegal app state transition: {self:?} -> {next:?}"),
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Failure {
    pub kind: ErrorKindWire,
    pub step: Option<usize>,
    pub message: String,
    pub log_tail: Vec<String>,
}

/// Wire-stable mirror of [`ErrorKind`] for persisted records: [`ErrorKind`]
/// itself already serializes as snake_case, but keeping a distinct wire type
/// here means the persisted schema doesn't silently change shape
/// if `ErrorKind` grows non-serialization-related variants later.
pub type ErrorKindWire = ErrorKind;

/// Canonical persisted state record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppStateRecord {
    pub schema: u32,
    pub app_id: crate::AppId,
    pub status: AppState,
    pub profile_hash: Option<String>,
    pub installed_at: Option<DateTime<Utc>>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub failure: Option<Failure>,
}

impl AppStateRecord {
    pub const CURRENT_SCHEMA: u32 = 1;

    pub fn new(app_id: crate::AppId) -> Self {
        Self {
            schema: Self::CURRENT_SCHEMA,
            app_id,
            status: AppState::Absent,
            profile_hash: None,
            installed_at: None,
            last_run_at: None,
            failure: None,
        }
    }

    /// Applies a state transition, validating legality and stamping the
    /// record so the post-transition value is always fully formed before a
    /// caller persists it.
    pub fn transition(&mut self, next: AppState, clock: &impl crate::Clock) -> Result<(), Error> {
        self.status.validate_transition(next)?;
        self.status = next;
        match next {
            AppState::Installed if self.installed_at.is_none() => {
                self.installed_at = Some(clock.utc_now());
            }
            AppState::Running => {
                self.last_run_at = Some(clock.utc_now());
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
