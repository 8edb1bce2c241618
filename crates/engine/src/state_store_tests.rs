// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pinokio_core::AppState;

#[tokio::test]
async fn loading_an_unknown_app_yields_a_fresh_absent_record() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = StateStore::new(dir.path());
    let record = store.load(&AppId::new("app-a")).await.expect("load");
    assert_eq!(record.status, AppState::Absent);
}

#[tokio::test]
async fn saved_records_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = StateStore::new(dir.path());
    let clock = pinokio_core::FakeClock::default();
    let mut record = AppStateRecord::new(AppId::new("app-a"));
    record.transition(AppState::Analyzing, &clock).expect("transition");
    store.save(&record).await.expect("save");

    let reloaded = store.load(&AppId::new("app-a")).await.expect("reload");
    assert_eq!(reloaded.status, AppState::Analyzing);
}

#[tokio::test]
async fn removing_a_record_makes_it_load_as_fresh_again() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = StateStore::new(dir.path());
    let clock = pinokio_core::FakeClock::default();
    let mut record = AppStateRecord::new(AppId::new("app-a"));
    record.transition(AppState::Analyzing, &clock).expect("transition");
    store.save(&record).await.expect("save");

    store.remove(&AppId::new("app-a")).await.expect("remove");
    let reloaded = store.load(&AppId::new("app-a")).await.expect("reload");
    assert_eq!(reloaded.status, AppState::Absent);
}

#[tokio::test]
async fn removing_a_nonexistent_record_is_not_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = StateStore::new(dir.path());
    store.remove(&AppId::new("never-existed")).await.expect("remove is idempotent");
}
