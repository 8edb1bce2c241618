// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! App profile: the analyzed, cacheable description of an app.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppCategory {
    Image,
    Video,
    Audio,
    Text,
    Llm,
    Utility,
    Web,
    Data,
    Dev,
    Game,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallerKind {
    Js,
    Json,
    Requirements,
    Environment,
    Script,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiKind {
    Gradio,
    Streamlit,
    Flask,
    Fastapi,
    Django,
    Tornado,
    Dash,
    Jupyter,
    Custom,
    None,
}

/// Explicit dependency declarations extracted from manifest files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deps {
    #[serde(default)]
    pub pip: Vec<String>,
    #[serde(default)]
    pub conda: Vec<String>,
    #[serde(default)]
    pub npm: Vec<String>,
    #[serde(default)]
    pub system: Vec<String>,
}

impl Deps {
    pub fn is_empty(&self) -> bool {
        self.pip.is_empty() && self.conda.is_empty() && self.npm.is_empty() && self.system.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceEstimate {
    pub mem_mb: u32,
    pub disk_mb: u32,
    pub cpu: f32,
    pub gpu_mem_mb: u32,
}

/// Immutable-after-analysis description of an app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppProfile {
    pub id: crate::AppId,
    pub category: AppCategory,
    pub complexity: Complexity,
    pub installer_kind: InstallerKind,
    pub ui_kind: UiKind,
    pub port: Option<u16>,
    pub share_default: bool,
    pub deps: Deps,
    pub needs_tunnel: bool,
    pub resource_estimate: ResourceEstimate,
    /// Hex digest of the analyzed source tree; used to detect drift.
    pub hash: String,
}

impl AppProfile {
    /// An `AppProfile` round-trips through install/uninstall/analyze iff this
    /// hash is stable. The hash is computed purely from
    /// analysis inputs, never from installer run state, so it is reproducible.
    pub fn needs_tunnel_for(ui_kind: UiKind) -> bool {
        !matches!(ui_kind, UiKind::None | UiKind::Jupyter)
    }
}
