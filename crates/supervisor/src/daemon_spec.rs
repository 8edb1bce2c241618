// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon variant of a tracked process: a restart policy with
//! exponential backoff, layered on top of the plain `Start`/`Stop` surface.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    Never,
    OnFailure,
    Always,
}

impl RestartPolicy {
    /// Whether a process exiting with `code` should be restarted under this
    /// policy. `code = None` (signalled/lost) counts as a failure.
    pub fn should_restart(self, code: Option<i32>) -> bool {
        match self {
            RestartPolicy::Never => false,
            RestartPolicy::Always => true,
            RestartPolicy::OnFailure => code.map(|c| c != 0).unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
    pub multiplier: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self { initial: Duration::from_secs(1), max: Duration::from_secs(60), multiplier: 2.0 }
    }
}

impl Backoff {
    /// Delay before the `attempt`-th restart (0-indexed), capped at `max`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let scaled = self.initial.as_secs_f64() * self.multiplier.powi(attempt as i32);
        Duration::from_secs_f64(scaled.min(self.max.as_secs_f64()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonSpec {
    pub restart_policy: RestartPolicy,
    pub max_restarts: u32,
    pub backoff: Backoff,
    pub health_check: Option<String>,
}

impl Default for DaemonSpec {
    fn default() -> Self {
        Self {
            restart_policy: RestartPolicy::Never,
            max_restarts: 0,
            backoff: Backoff::default(),
            health_check: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_caps_at_max() {
        let b = Backoff { initial: Duration::from_secs(1), max: Duration::from_secs(10), multiplier: 2.0 };
        assert_eq!(b.delay(0), Duration::from_secs(1));
        assert_eq!(b.delay(1), Duration::from_secs(2));
        assert_eq!(b.delay(10), Duration::from_secs(10));
    }

    #[test]
    fn restart_policy_on_failure_ignores_clean_exit() {
        assert!(!RestartPolicy::OnFailure.should_restart(Some(0)));
        assert!(RestartPolicy::OnFailure.should_restart(Some(1)));
        assert!(RestartPolicy::OnFailure.should_restart(None));
        assert!(!RestartPolicy::Never.should_restart(None));
        assert!(RestartPolicy::Always.should_restart(Some(0)));
    }
}
