// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: on-disk layout roots and the detected/overridden
//! platform. Grounded on the teacher's `lifecycle::Config::load`, trimmed
//! to the single Unix-socket-per-user daemon spec §6 describes (no TCP
//! listener, no WAL/snapshot paths — those are `pinokio-cache`'s and
//! `pinokio-engine`'s own concerns, not the daemon's).

use pinokio_core::{Platform, PlatformKind};
use std::path::PathBuf;

/// Daemon startup configuration, resolved once at process start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root control directory (distinct from the platform base path):
    /// holds the Unix socket, PID file, and daemon log.
    pub control_dir: PathBuf,
    pub socket_path: PathBuf,
    pub pid_path: PathBuf,
    pub log_path: PathBuf,
    /// Operator-forced platform kind from `--platform-override`, bypassing
    /// detection.
    pub platform_override: Option<PlatformKind>,
    /// Overrides the detected/overridden platform's base path.
    pub base_path_override: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    /// Resolves the control directory under `$XDG_STATE_HOME/pinokio` (or
    /// `~/.local/state/pinokio`), mirroring the teacher's `~/.local/state/oj`
    /// convention.
    pub fn load(platform_override: Option<PlatformKind>, base_path_override: Option<PathBuf>, log_level: String) -> Result<Self, ConfigError> {
        let control_dir = control_dir()?;
        Ok(Self {
            socket_path: control_dir.join("daemon.sock"),
            pid_path: control_dir.join("daemon.pid"),
            log_path: control_dir.join("daemon.log"),
            control_dir,
            platform_override,
            base_path_override,
            log_level,
        })
    }

    /// Resolves the platform: an explicit `--platform-override` wins over
    /// detection, and `--base-path` overrides either's base path.
    pub fn resolve_platform(&self) -> Platform {
        let mut platform = match self.platform_override {
            Some(kind) => pinokio_platform::for_kind(kind),
            None => pinokio_platform::detect(),
        };
        if let Some(base_path) = &self.base_path_override {
            platform.base_path = base_path.clone();
        }
        platform
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine a state directory for this user")]
    NoStateDir,
}

fn control_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("pinokio"));
    }
    dirs::home_dir().map(|home| home.join(".local/state/pinokio")).ok_or(ConfigError::NoStateDir)
}
