// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cache entry metadata. Entries are exclusively owned by
//! the Cache Manager; readers receive copies or, for large blobs, a
//! reference invalidated via broadcast on eviction.

use crate::CacheKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheLayer {
    Memory,
    Disk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKind {
    AppMetadata,
    ModelBlob,
    DepInfo,
    InstallState,
    ProcessInfo,
    TunnelConfig,
    PlatformConfig,
    UserPrefs,
}

impl CacheKind {
    /// Directory name under `cache/disk/<kind>/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            CacheKind::AppMetadata => "app_metadata",
            CacheKind::ModelBlob => "model_blob",
            CacheKind::DepInfo => "dep_info",
            CacheKind::InstallState => "install_state",
            CacheKind::ProcessInfo => "process_info",
            CacheKind::TunnelConfig => "tunnel_config",
            CacheKind::PlatformConfig => "platform_config",
            CacheKind::UserPrefs => "user_prefs",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntryMeta {
    pub key: CacheKey,
    pub layer: CacheLayer,
    pub kind: CacheKind,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub last_access_at: DateTime<Utc>,
    pub hits: u64,
    pub ttl_s: Option<u64>,
    pub priority: u8,
}

impl CacheEntryMeta {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.ttl_s {
            Some(ttl) => now.signed_duration_since(self.created_at).num_seconds() >= ttl as i64,
            None => false,
        }
    }
}
