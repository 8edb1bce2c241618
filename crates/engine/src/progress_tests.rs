// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn a_subscriber_receives_emitted_progress() {
    let bus = ProgressBus::new();
    let mut rx = bus.watch();
    let clock = pinokio_core::FakeClock::default();
    bus.emit(&clock, AppId::new("app-a"), "installing", "pip install torch", Some(40));

    let event = rx.recv().await.expect("event");
    match event {
        Event::InstallProgress { app_id, phase, pct, .. } => {
            assert_eq!(app_id.as_str(), "app-a");
            assert_eq!(phase, "installing");
            assert_eq!(pct, Some(40));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn emitting_with_no_subscribers_does_not_panic() {
    let bus = ProgressBus::new();
    let clock = pinokio_core::FakeClock::default();
    bus.emit(&clock, AppId::new("app-a"), "installing", "no one is listening", None);
}
