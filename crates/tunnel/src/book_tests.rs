// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::book::Book;
use chrono::Utc;
use pinokio_core::{TunnelId, TunnelMetrics, TunnelProvider, TunnelRecord, TunnelStatus};

fn record(id: &str) -> TunnelRecord {
    TunnelRecord {
        id: TunnelId::new(id),
        provider: TunnelProvider::Ngrok,
        local_port: 7860,
        url: Some(format!("https://{id}.ngrok.io")),
        created_at: Utc::now(),
        last_health_at: None,
        status: TunnelStatus::Active,
        auth_required: false,
        metrics: TunnelMetrics::default(),
    }
}

#[tokio::test]
async fn upsert_then_reload_roundtrips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut book = Book::new(dir.path());
    book.upsert(record("tun-a")).await.expect("upsert");

    let mut reloaded = Book::new(dir.path());
    reloaded.load().await.expect("load");
    assert_eq!(reloaded.get(&TunnelId::new("tun-a")).expect("present").local_port, 7860);
}

#[tokio::test]
async fn close_then_list_never_shows_the_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut book = Book::new(dir.path());
    book.upsert(record("tun-b")).await.expect("upsert");
    book.mark_closed(&TunnelId::new("tun-b")).await.expect("close");

    let visible: Vec<_> = book.all().into_iter().filter(|r| r.status != TunnelStatus::Closed).collect();
    assert!(visible.is_empty());
}

#[tokio::test]
async fn prune_closed_removes_only_closed_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut book = Book::new(dir.path());
    book.upsert(record("tun-c")).await.expect("upsert");
    book.upsert(record("tun-d")).await.expect("upsert");
    book.mark_closed(&TunnelId::new("tun-c")).await.expect("close");

    let removed = book.prune_closed().await.expect("prune");
    assert_eq!(removed, 1);
    assert!(book.get(&TunnelId::new("tun-d")).is_some());
    assert!(book.get(&TunnelId::new("tun-c")).is_none());
}
