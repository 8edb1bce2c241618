// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Platform record. Immutable for the process lifetime.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    Colab,
    Vast,
    Lightning,
    Paperspace,
    Runpod,
    Unknown,
}

impl PlatformKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformKind::Colab => "colab",
            PlatformKind::Vast => "vast",
            PlatformKind::Lightning => "lightning",
            PlatformKind::Paperspace => "paperspace",
            PlatformKind::Runpod => "runpod",
            PlatformKind::Unknown => "unknown",
        }
    }
}

/// Parses the CLI's `--platform-override` flag value. Unrecognized input is
/// a plain parse error, not a fallback to `Unknown` — an operator who typos
/// the flag should see a rejection, not silently get undetected behavior.
impl FromStr for PlatformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "colab" => Ok(PlatformKind::Colab),
            "vast" => Ok(PlatformKind::Vast),
            "lightning" => Ok(PlatformKind::Lightning),
            "paperspace" => Ok(PlatformKind::Paperspace),
            "runpod" => Ok(PlatformKind::Runpod),
            "unknown" => Ok(PlatformKind::Unknown),
            other => Err(format!("unrecognized platform kind `{other}`")),
        }
    }
}

/// Logical path names resolved by the Path Mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    Apps,
    Data,
    Cache,
    Logs,
    Models,
    Config,
    Workspace,
    Tmp,
    /// Per-app environment directory (`envs/<app_id>/`), not one of the
    /// spec's eight named logical paths but required by §6's on-disk layout
    /// and the Environment Manager (§4.C).
    Env,
    /// `state/` for app state records and the supervisor snapshot.
    State,
    /// `tunnels/` for the URL book.
    Tunnels,
}

impl PathKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            PathKind::Apps => "apps",
            PathKind::Data => "data",
            PathKind::Cache => "cache",
            PathKind::Logs => "logs",
            PathKind::Models => "models",
            PathKind::Config => "config",
            PathKind::Workspace => "workspace",
            PathKind::Tmp => "tmp",
            PathKind::Env => "envs",
            PathKind::State => "state",
            PathKind::Tunnels => "tunnels",
        }
    }
}

bitflags::bitflags! {
    /// Capability bitset.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PlatformFeatures: u16 {
        const GPU = 1 << 0;
        const DRIVE_MOUNT = 1 << 1;
        const SSH = 1 << 2;
        const DOCKER = 1 << 3;
        const OUTBOUND_NETWORK = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlatformCaps {
    pub max_mem_gb: f32,
    pub max_disk_gb: f32,
    pub max_cpu: f32,
    pub max_gpu: u32,
    pub session_ttl_s: u64,
    pub idle_ttl_s: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub kind: PlatformKind,
    pub base_path: std::path::PathBuf,
    pub caps: PlatformCaps,
    pub features: PlatformFeatures,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    pub detection_evidence: Vec<String>,
}

impl Platform {
    pub fn has_feature(&self, feature: PlatformFeatures) -> bool {
        self.features.contains(feature)
    }
}
