// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders shared across crates (feature-gated) so downstream
//! crates don't each reinvent fixture construction.

use crate::{
    AppCategory, AppId, AppProfile, Complexity, Deps, InstallerKind, ResourceEstimate, UiKind,
};

pub struct AppProfileBuilder {
    profile: AppProfile,
}

impl AppProfileBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            profile: AppProfile {
                id: AppId::new(id.into()),
                category: AppCategory::Unknown,
                complexity: Complexity::Simple,
                installer_kind: InstallerKind::Requirements,
                ui_kind: UiKind::Gradio,
                port: Some(7860),
                share_default: false,
                deps: Deps::default(),
                needs_tunnel: true,
                resource_estimate: ResourceEstimate::default(),
                hash: "deadbeef".to_string(),
            },
        }
    }

    pub fn installer_kind(mut self, kind: InstallerKind) -> Self {
        self.profile.installer_kind = kind;
        self
    }

    pub fn deps(mut self, deps: Deps) -> Self {
        self.profile.deps = deps;
        self
    }

    pub fn build(self) -> AppProfile {
        self.profile
    }
}
