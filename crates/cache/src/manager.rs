// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Cache Manager: a memory layer backed by a disk layer,
//! tiered per-kind eviction policies, and a cleanup loop. Grounded on
//! `oj-daemon/src/storage/snapshot.rs`'s atomic-write persistence shape,
//! generalized from a single WAL-backed snapshot to a multi-kind,
//! multi-layer cache with its own metadata index.

use crate::disk;
use crate::index::Index;
use crate::memory::MemoryLayer;
use crate::policy::MODEL_BLOB_DISK_THRESHOLD_BYTES;
use crate::stats::CacheStats;
use crate::value::CacheValue;
use chrono::Utc;
use parking_lot::Mutex;
use pinokio_core::{CacheEntryMeta, CacheKey, CacheKind, CacheLayer, Error, Event};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Default)]
pub struct PutOpts {
    pub ttl_s: Option<u64>,
    /// 1..=5; unset defaults to 3.
    pub priority: Option<u8>,
}

struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }
}

/// Owns both cache layers and their shared metadata index.
pub struct CacheManager {
    root: PathBuf,
    mem_cap_bytes: u64,
    disk_cap_bytes: u64,
    index: Mutex<Index>,
    memory: Mutex<MemoryLayer>,
    counters: Counters,
    events_tx: broadcast::Sender<Event>,
}

impl CacheManager {
    pub fn new(root: PathBuf, mem_cap_bytes: u64, disk_cap_bytes: u64) -> Arc<Self> {
        let (events_tx, _) = broadcast::channel(1024);
        Arc::new(Self {
            root,
            mem_cap_bytes,
            disk_cap_bytes,
            index: Mutex::new(Index::new()),
            memory: Mutex::new(MemoryLayer::new()),
            counters: Counters::default(),
            events_tx,
        })
    }

    fn index_path(&self) -> PathBuf {
        self.root.join("memory.idx")
    }

    pub fn watch(&self) -> broadcast::Receiver<Event> {
        self.events_tx.subscribe()
    }

    /// Loads the persisted index from `cache/memory.idx`. A missing file is
    /// treated as an empty cache, not an error (first run on a fresh
    /// `base_path`).
    pub async fn load(&self) -> Result<(), Error> {
        let path = self.index_path();
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let index: Index = serde_json::from_slice(&bytes).map_err(|e| Error::corrupt(e.to_string()))?;
                *self.index.lock() = index;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(pinokio_shell::error::ShellError::from_io(&path, e).into()),
        }
    }

    async fn save_index(&self) -> Result<(), Error> {
        let snapshot = {
            let index = self.index.lock();
            serde_json::to_vec_pretty(&*index).map_err(|e| Error::corrupt(e.to_string()))?
        };
        pinokio_shell::fs::atomic_write(&self.index_path(), &snapshot).await.map_err(Error::from)
    }

    /// Reads `key` of `kind`. Memory is consulted first; a disk hit is
    /// promoted back into memory unless the value is a `model_blob` above
    /// the disk-only threshold.
    pub async fn get(&self, key: &CacheKey, kind: CacheKind) -> Result<Option<CacheValue>, Error> {
        let now = Utc::now();

        if let Some(meta) = self.index.lock().get(key, CacheLayer::Memory).cloned() {
            if meta.is_expired(now) {
                self.invalidate(key).await?;
            } else if let Some(value) = self.memory.lock().get(key) {
                self.index.lock().touch(key, CacheLayer::Memory, now);
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Some(value));
            }
        }

        let as_json = kind != CacheKind::ModelBlob;
        let disk_meta = self.index.lock().get(key, CacheLayer::Disk).cloned();
        if let Some(meta) = disk_meta {
            if meta.is_expired(now) {
                self.invalidate(key).await?;
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                return Ok(None);
            }
            if let Some(value) = disk::read(&self.root, key, kind, as_json).await? {
                self.index.lock().touch(key, CacheLayer::Disk, now);
                self.counters.hits.fetch_add(1, Ordering::Relaxed);

                if value.size_bytes() < MODEL_BLOB_DISK_THRESHOLD_BYTES {
                    self.promote_to_memory(key, kind, &value, meta.ttl_s, meta.priority, now).await;
                }
                return Ok(Some(value));
            }
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        Ok(None)
    }

    async fn promote_to_memory(
        &self,
        key: &CacheKey,
        kind: CacheKind,
        value: &CacheValue,
        ttl_s: Option<u64>,
        priority: u8,
        now: chrono::DateTime<Utc>,
    ) {
        let size = value.size_bytes();
        self.evict_until_fits(kind, size).await;
        self.memory.lock().insert(key.clone(), value.clone());
        self.index.lock().insert(CacheEntryMeta {
            key: key.clone(),
            layer: CacheLayer::Memory,
            kind,
            size_bytes: size,
            created_at: now,
            last_access_at: now,
            hits: 0,
            ttl_s,
            priority,
        });
    }

    /// Writes `value` to both layers, except
    /// `model_blob` entries at or above [`MODEL_BLOB_DISK_THRESHOLD_BYTES`],
    /// which are disk-only. Evicts via each kind's policy until the memory
    /// layer plus the new entry fits within `mem_cap_bytes` before writing.
    pub async fn put(&self, key: CacheKey, value: CacheValue, kind: CacheKind, opts: PutOpts) -> Result<(), Error> {
        let now = Utc::now();
        let size = value.size_bytes();
        let priority = opts.priority.unwrap_or(3).clamp(1, 5);
        let ttl_s = opts.ttl_s.or_else(|| crate::policy::default_ttl_s(kind));

        disk::write(&self.root, &key, kind, &value).await?;
        self.index.lock().insert(CacheEntryMeta {
            key: key.clone(),
            layer: CacheLayer::Disk,
            kind,
            size_bytes: size,
            created_at: now,
            last_access_at: now,
            hits: 0,
            ttl_s,
            priority,
        });

        let disk_only = kind == CacheKind::ModelBlob && size >= MODEL_BLOB_DISK_THRESHOLD_BYTES;
        if !disk_only {
            self.evict_until_fits(kind, size).await;
            self.memory.lock().insert(key.clone(), value);
            self.index.lock().insert(CacheEntryMeta {
                key,
                layer: CacheLayer::Memory,
                kind,
                size_bytes: size,
                created_at: now,
                last_access_at: now,
                hits: 0,
                ttl_s,
                priority,
            });
        }

        self.save_index().await
    }

    /// Evicts `kind`-policy victims from the memory layer until
    /// `current + incoming <= mem_cap_bytes`.
    async fn evict_until_fits(&self, kind: CacheKind, incoming: u64) {
        loop {
            let over = {
                let index = self.index.lock();
                index.total_bytes(CacheLayer::Memory) + incoming > self.mem_cap_bytes
            };
            if !over {
                break;
            }
            let victim = self.index.lock().victim_for_kind(CacheLayer::Memory, kind);
            let Some(victim) = victim else {
                // No evictable same-kind candidate fits the bill; fall back
                // to the lowest-priority entry across the whole layer
                // rather than blocking the put forever.
                match self.index.lock().lowest_priority_victim(CacheLayer::Memory) {
                    Some(v) => v,
                    None => break,
                }
            };
            self.memory.lock().remove(&victim);
            self.index.lock().remove(&victim, CacheLayer::Memory);
            self.counters.evictions.fetch_add(1, Ordering::Relaxed);
            self.events_tx.send(Event::CacheInvalidated { key: victim, at: Utc::now() }).ok();
        }
    }

    /// Removes `key` from every layer. Idempotent: invalidating an absent
    /// key returns `false` without side effects.
    pub async fn invalidate(&self, key: &CacheKey) -> Result<bool, Error> {
        let kind = self.index.lock().get(key, CacheLayer::Disk).map(|m| m.kind).or_else(|| self.index.lock().get(key, CacheLayer::Memory).map(|m| m.kind));
        self.memory.lock().remove(key);
        let present = self.index.lock().remove_all_layers(key);
        if let Some(kind) = kind {
            disk::remove(&self.root, key, kind).await?;
        }
        if present {
            self.events_tx.send(Event::CacheInvalidated { key: key.clone(), at: Utc::now() }).ok();
            self.save_index().await?;
        }
        Ok(present)
    }

    /// Warms the cache for `app_id` by touching its existing entries so a
    /// subsequent `get` reads from memory. Spec §4.J names `Prefetch(app_id)`
    /// without specifying a data source beyond the cache's own layers, so
    /// this promotes whatever is already on disk for that app into memory
    /// rather than fabricating a fetch from a component the cache has no
    /// handle to.
    pub async fn prefetch(&self, app_id_prefix: &str) -> Result<usize, Error> {
        let candidates: Vec<(CacheKey, CacheKind, Option<u64>, u8)> = self
            .index
            .lock()
            .for_app(app_id_prefix)
            .into_iter()
            .filter(|m| m.layer == CacheLayer::Disk)
            .map(|m| (m.key.clone(), m.kind, m.ttl_s, m.priority))
            .collect();

        let mut warmed = 0;
        for (key, kind, ttl_s, priority) in candidates {
            if kind == CacheKind::ModelBlob {
                continue;
            }
            let as_json = true;
            if let Some(value) = disk::read(&self.root, &key, kind, as_json).await? {
                self.promote_to_memory(&key, kind, &value, ttl_s, priority, Utc::now()).await;
                warmed += 1;
            }
        }
        Ok(warmed)
    }

    pub fn stats(&self) -> CacheStats {
        let index = self.index.lock();
        CacheStats {
            entries: index.len(),
            memory_bytes: index.total_bytes(CacheLayer::Memory),
            memory_cap_bytes: self.mem_cap_bytes,
            disk_bytes: index.total_bytes(CacheLayer::Disk),
            disk_cap_bytes: self.disk_cap_bytes,
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            expirations: self.counters.expirations.load(Ordering::Relaxed),
        }
    }

    /// Removes expired entries and enforces the disk cap by evicting the
    /// lowest `(priority, last_access_at)` entry until back under budget.
    pub async fn cleanup(&self) -> Result<(), Error> {
        let now = Utc::now();
        let expired = self.index.lock().expired(now);
        for (key, layer) in expired {
            match layer {
                CacheLayer::Memory => {
                    self.memory.lock().remove(&key);
                    self.index.lock().remove(&key, CacheLayer::Memory);
                }
                CacheLayer::Disk => {
                    if let Some(kind) = self.index.lock().get(&key, CacheLayer::Disk).map(|m| m.kind) {
                        disk::remove(&self.root, &key, kind).await?;
                    }
                    self.index.lock().remove(&key, CacheLayer::Disk);
                }
            }
            self.counters.expirations.fetch_add(1, Ordering::Relaxed);
            self.events_tx.send(Event::CacheInvalidated { key, at: now }).ok();
        }

        loop {
            let over = self.index.lock().total_bytes(CacheLayer::Disk) > self.disk_cap_bytes;
            if !over {
                break;
            }
            let Some(victim) = self.index.lock().lowest_priority_victim(CacheLayer::Disk) else { break };
            if let Some(kind) = self.index.lock().get(&victim, CacheLayer::Disk).map(|m| m.kind) {
                disk::remove(&self.root, &victim, kind).await?;
            }
            self.index.lock().remove(&victim, CacheLayer::Disk);
            self.counters.evictions.fetch_add(1, Ordering::Relaxed);
            self.events_tx.send(Event::CacheInvalidated { key: victim, at: now }).ok();
        }

        self.save_index().await
    }
}
