// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-kind cache policies. The table pins one *primary*
//! policy per [`CacheKind`]; `effective_policy` additionally resolves the
//! `adaptive` kind's live policy from its observed hit count.

use pinokio_core::CacheKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Lru,
    Lfu,
    Ttl,
    Adaptive,
    /// Never auto-evicted (`platform_config`, `user_prefs`).
    Persistent,
}

/// `model_blob` entries above this size skip the memory layer entirely.
pub const MODEL_BLOB_DISK_THRESHOLD_BYTES: u64 = 8 * 1024 * 1024;

/// Adaptive policy shift thresholds.
pub const ADAPTIVE_LFU_THRESHOLD: u64 = 10;
pub const ADAPTIVE_TTL_FLOOR: u64 = 2;

pub fn policy_for(kind: CacheKind) -> Policy {
    match kind {
        CacheKind::AppMetadata => Policy::Lru,
        CacheKind::ModelBlob => Policy::Lfu,
        CacheKind::DepInfo => Policy::Ttl,
        CacheKind::InstallState => Policy::Adaptive,
        CacheKind::ProcessInfo => Policy::Ttl,
        CacheKind::TunnelConfig => Policy::Lru,
        CacheKind::PlatformConfig => Policy::Persistent,
        CacheKind::UserPrefs => Policy::Persistent,
    }
}

/// Resolves `adaptive` to its live policy given the entry's observed hit
/// count; every other kind's policy is fixed.
pub fn effective_policy(kind: CacheKind, hits: u64) -> Policy {
    match policy_for(kind) {
        Policy::Adaptive if hits >= ADAPTIVE_LFU_THRESHOLD => Policy::Lfu,
        Policy::Adaptive if hits < ADAPTIVE_TTL_FLOOR => Policy::Ttl,
        other => other,
    }
}

/// Default TTLs for the kinds whose primary policy is `ttl`.
pub fn default_ttl_s(kind: CacheKind) -> Option<u64> {
    match kind {
        CacheKind::DepInfo => Some(24 * 3600),
        CacheKind::ProcessInfo => Some(5 * 60),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adaptive_shifts_with_hits() {
        assert_eq!(effective_policy(CacheKind::InstallState, 0), Policy::Ttl);
        assert_eq!(effective_policy(CacheKind::InstallState, 5), Policy::Adaptive);
        assert_eq!(effective_policy(CacheKind::InstallState, 10), Policy::Lfu);
    }

    #[test]
    fn persistent_kinds_never_adapt() {
        assert_eq!(policy_for(CacheKind::PlatformConfig), Policy::Persistent);
        assert_eq!(policy_for(CacheKind::UserPrefs), Policy::Persistent);
    }
}
