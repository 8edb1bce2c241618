// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The cache's metadata index: a small, flat store of
//! [`CacheEntryMeta`], persisted as `cache/memory.idx`. A given
//! [`CacheKey`] may have one meta per layer (a `put` writes both the memory
//! and disk copy), so entries are keyed by `(CacheKey, CacheLayer)`.
//! Selecting an eviction victim is the index's job; actually deleting the
//! value lives in `memory.rs`/`disk.rs`.

use crate::policy::{effective_policy, Policy};
use chrono::{DateTime, Utc};
use pinokio_core::{CacheEntryMeta, CacheKey, CacheKind, CacheLayer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct IndexKey(CacheKey, CacheLayer);

/// Persisted shape of [`Index`]: a flat array, since `(CacheKey,
/// CacheLayer)` tuple keys aren't valid JSON object keys. `memory.idx`
/// round-trips through this list on load/save.
#[derive(Debug, Default)]
pub struct Index {
    entries: HashMap<IndexKey, CacheEntryMeta>,
}

impl Serialize for Index {
    fn serialize<S: serde::Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let list: Vec<&CacheEntryMeta> = self.entries.values().collect();
        list.serialize(ser)
    }
}

impl<'de> Deserialize<'de> for Index {
    fn deserialize<D: serde::Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let list = Vec::<CacheEntryMeta>::deserialize(de)?;
        let mut idx = Index::new();
        for meta in list {
            idx.insert(meta);
        }
        Ok(idx)
    }
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey, layer: CacheLayer) -> Option<&CacheEntryMeta> {
        self.entries.get(&IndexKey(key.clone(), layer))
    }

    pub fn insert(&mut self, meta: CacheEntryMeta) {
        self.entries.insert(IndexKey(meta.key.clone(), meta.layer), meta);
    }

    pub fn remove(&mut self, key: &CacheKey, layer: CacheLayer) -> Option<CacheEntryMeta> {
        self.entries.remove(&IndexKey(key.clone(), layer))
    }

    /// Removes every layer's meta for `key`. Returns whether anything was
    /// present.
    pub fn remove_all_layers(&mut self, key: &CacheKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|k, _| &k.0 != key);
        self.entries.len() != before
    }

    /// Marks a hit: bumps `hits` and `last_access_at`.
    pub fn touch(&mut self, key: &CacheKey, layer: CacheLayer, now: DateTime<Utc>) {
        if let Some(meta) = self.entries.get_mut(&IndexKey(key.clone(), layer)) {
            meta.hits += 1;
            meta.last_access_at = now;
        }
    }

    pub fn total_bytes(&self, layer: CacheLayer) -> u64 {
        self.entries.values().filter(|m| m.layer == layer).map(|m| m.size_bytes).sum()
    }

    pub fn for_app(&self, prefix: &str) -> Vec<&CacheEntryMeta> {
        self.entries.values().filter(|m| m.key.as_str().starts_with(prefix)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn expired(&self, now: DateTime<Utc>) -> Vec<(CacheKey, CacheLayer)> {
        self.entries.values().filter(|m| m.is_expired(now)).map(|m| (m.key.clone(), m.layer)).collect()
    }

    /// Picks the eviction victim among `layer` entries of `kind`, per that
    /// kind's policy: lowest `last_access_at` for LRU, fewest
    /// `hits` for LFU, oldest `created_at` for TTL. `persistent` kinds are
    /// never candidates.
    pub fn victim_for_kind(&self, layer: CacheLayer, kind: CacheKind) -> Option<CacheKey> {
        let policy = crate::policy::policy_for(kind);
        if policy == Policy::Persistent {
            return None;
        }
        let mut candidates: Vec<&CacheEntryMeta> =
            self.entries.values().filter(|m| m.layer == layer && m.kind == kind).collect();
        if candidates.is_empty() {
            return None;
        }
        candidates.sort_by(|a, b| match effective_policy(kind, a.hits) {
            Policy::Lfu => a.hits.cmp(&b.hits).then(a.last_access_at.cmp(&b.last_access_at)),
            Policy::Ttl => a.created_at.cmp(&b.created_at),
            _ => a.last_access_at.cmp(&b.last_access_at),
        });
        candidates.first().map(|m| m.key.clone())
    }

    /// Picks the global eviction victim across `layer` by the lowest
    /// `(priority, last_access_at)` tuple.
    pub fn lowest_priority_victim(&self, layer: CacheLayer) -> Option<CacheKey> {
        self.entries
            .values()
            .filter(|m| m.layer == layer && crate::policy::policy_for(m.kind) != Policy::Persistent)
            .min_by(|a, b| a.priority.cmp(&b.priority).then(a.last_access_at.cmp(&b.last_access_at)))
            .map(|m| m.key.clone())
    }

    pub fn all(&self) -> impl Iterator<Item = &CacheEntryMeta> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn meta(key: &str, kind: CacheKind, hits: u64, age_secs: i64) -> CacheEntryMeta {
        let now = Utc::now();
        CacheEntryMeta {
            key: CacheKey::new(key),
            layer: CacheLayer::Memory,
            kind,
            size_bytes: 10,
            created_at: now - Duration::seconds(age_secs),
            last_access_at: now - Duration::seconds(age_secs),
            hits,
            ttl_s: None,
            priority: 3,
        }
    }

    #[test]
    fn lru_victim_is_oldest_access() {
        let mut idx = Index::new();
        idx.insert(meta("a", CacheKind::AppMetadata, 5, 100));
        idx.insert(meta("b", CacheKind::AppMetadata, 5, 10));
        let victim = idx.victim_for_kind(CacheLayer::Memory, CacheKind::AppMetadata);
        assert_eq!(victim, Some(CacheKey::new("a")));
    }

    #[test]
    fn lfu_victim_is_fewest_hits() {
        let mut idx = Index::new();
        idx.insert(meta("a", CacheKind::ModelBlob, 9, 10));
        idx.insert(meta("b", CacheKind::ModelBlob, 1, 10));
        let victim = idx.victim_for_kind(CacheLayer::Memory, CacheKind::ModelBlob);
        assert_eq!(victim, Some(CacheKey::new("b")));
    }

    #[test]
    fn persistent_kind_has_no_victim() {
        let mut idx = Index::new();
        idx.insert(meta("a", CacheKind::UserPrefs, 0, 1000));
        assert_eq!(idx.victim_for_kind(CacheLayer::Memory, CacheKind::UserPrefs), None);
    }

    #[test]
    fn remove_all_layers_clears_both() {
        let mut idx = Index::new();
        let mut disk_meta = meta("a", CacheKind::AppMetadata, 0, 0);
        disk_meta.layer = CacheLayer::Disk;
        idx.insert(meta("a", CacheKind::AppMetadata, 0, 0));
        idx.insert(disk_meta);
        assert_eq!(idx.len(), 2);
        assert!(idx.remove_all_layers(&CacheKey::new("a")));
        assert!(idx.is_empty());
        assert!(!idx.remove_all_layers(&CacheKey::new("a")));
    }
}
