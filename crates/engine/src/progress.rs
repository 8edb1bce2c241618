// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Install progress reporting.
//!
//! Progress is a lazy, restartable sequence: emitting never blocks on a
//! subscriber, and a subscriber that joins mid-install only sees events
//! from that point on (the install's durable record of where it actually
//! is lives in the [`crate::state_store`]/[`crate::steps::Checkpoint`],
//! not in this stream).

use pinokio_core::{AppId, Clock, Event};
use tokio::sync::broadcast;

#[derive(Debug, Clone)]
pub struct ProgressBus {
    tx: broadcast::Sender<Event>,
}

impl Default for ProgressBus {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }
}

impl ProgressBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watch(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Emits one `{t, phase, message, pct?}` progress event. Dropped if
    /// there are no subscribers, same as any other broadcast publish.
    pub fn emit(&self, clock: &impl Clock, app_id: AppId, phase: impl Into<String>, message: impl Into<String>, pct: Option<u8>) {
        let _ = self.tx.send(Event::InstallProgress {
            app_id,
            phase: phase.into(),
            message: message.into(),
            pct,
            at: clock.utc_now(),
        });
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
