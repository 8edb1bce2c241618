// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::{CacheManager, CacheValue, PutOpts};
use pinokio_core::{CacheKey, CacheKind};

fn manager(mem_cap: u64, disk_cap: u64) -> (tempfile::TempDir, std::sync::Arc<CacheManager>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mgr = CacheManager::new(dir.path().to_path_buf(), mem_cap, disk_cap);
    (dir, mgr)
}

#[tokio::test]
async fn put_then_get_roundtrips_json() {
    let (_dir, mgr) = manager(1 << 20, 1 << 20);
    let key = CacheKey::new("app_metadata:demo");
    let value = CacheValue::Json(serde_json::json!({"id": "demo"}));
    mgr.put(key.clone(), value.clone(), CacheKind::AppMetadata, PutOpts::default()).await.expect("put");

    let got = mgr.get(&key, CacheKind::AppMetadata).await.expect("get").expect("present");
    assert_eq!(got, value);
}

#[tokio::test]
async fn invalidate_is_idempotent() {
    let (_dir, mgr) = manager(1 << 20, 1 << 20);
    let key = CacheKey::new("dep_info:demo");
    mgr.put(key.clone(), CacheValue::Json(serde_json::json!([])), CacheKind::DepInfo, PutOpts::default())
        .await
        .expect("put");

    assert!(mgr.invalidate(&key).await.expect("first invalidate"));
    assert!(!mgr.invalidate(&key).await.expect("second invalidate"));
    assert!(mgr.get(&key, CacheKind::DepInfo).await.expect("get").is_none());
}

#[tokio::test]
async fn memory_cap_evicts_lru_entry() {
    // Entries big enough that only one fits per kind's memory budget.
    let (_dir, mgr) = manager(40, 1 << 20);
    let blob = |n: usize| CacheValue::Blob(vec![7u8; n]);

    let a = CacheKey::new("tunnel_config:a");
    let b = CacheKey::new("tunnel_config:b");
    mgr.put(a.clone(), blob(20), CacheKind::TunnelConfig, PutOpts::default()).await.expect("put a");
    mgr.put(b.clone(), blob(20), CacheKind::TunnelConfig, PutOpts::default()).await.expect("put b");

    // `a` is now the LRU entry for the `tunnel_config` kind; inserting a
    // third should evict it from memory (disk copy remains).
    let c = CacheKey::new("tunnel_config:c");
    mgr.put(c.clone(), blob(20), CacheKind::TunnelConfig, PutOpts::default()).await.expect("put c");

    let stats = mgr.stats();
    assert!(stats.memory_bytes <= 40, "memory cap invariant violated: {stats:?}");
}

#[tokio::test]
async fn model_blob_above_threshold_is_disk_only() {
    let (_dir, mgr) = manager(1 << 20, 1 << 20);
    let key = CacheKey::new("model_blob:huge");
    let huge = CacheValue::Blob(vec![0u8; crate::policy::MODEL_BLOB_DISK_THRESHOLD_BYTES as usize + 1]);
    mgr.put(key.clone(), huge, CacheKind::ModelBlob, PutOpts::default()).await.expect("put");

    let stats = mgr.stats();
    assert_eq!(stats.memory_bytes, 0);
    assert!(stats.disk_bytes > 0);
}

#[tokio::test]
async fn cleanup_removes_expired_entries() {
    let (_dir, mgr) = manager(1 << 20, 1 << 20);
    let key = CacheKey::new("process_info:demo");
    mgr.put(
        key.clone(),
        CacheValue::Json(serde_json::json!({"pid": 1})),
        CacheKind::ProcessInfo,
        PutOpts { ttl_s: Some(0), priority: None },
    )
    .await
    .expect("put");

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    mgr.cleanup().await.expect("cleanup");

    assert!(mgr.get(&key, CacheKind::ProcessInfo).await.expect("get").is_none());
}

#[tokio::test]
async fn persistent_kind_never_evicted_by_cleanup() {
    let (_dir, mgr) = manager(1 << 20, 8);
    let key = CacheKey::new("platform_config:colab");
    mgr.put(
        key.clone(),
        CacheValue::Json(serde_json::json!({"kind": "colab"})),
        CacheKind::PlatformConfig,
        PutOpts::default(),
    )
    .await
    .expect("put");

    mgr.cleanup().await.expect("cleanup");
    assert!(mgr.get(&key, CacheKind::PlatformConfig).await.expect("get").is_some());
}

#[tokio::test]
async fn load_restores_persisted_index() {
    let dir = tempfile::tempdir().expect("tempdir");
    let key = CacheKey::new("user_prefs:demo");
    {
        let mgr = CacheManager::new(dir.path().to_path_buf(), 1 << 20, 1 << 20);
        mgr.put(key.clone(), CacheValue::Json(serde_json::json!({"theme": "dark"})), CacheKind::UserPrefs, PutOpts::default())
            .await
            .expect("put");
    }

    let reloaded = CacheManager::new(dir.path().to_path_buf(), 1 << 20, 1 << 20);
    reloaded.load().await.expect("load");
    assert_eq!(reloaded.stats().entries, 2); // memory + disk meta
}
