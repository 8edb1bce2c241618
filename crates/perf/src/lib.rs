// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Performance Monitor: samples system resources on a fixed cadence,
//! keeps a bounded history, and opens/closes alerts as thresholds are
//! crossed, triggering advisory optimization hooks.

mod history;
mod monitor;
mod sample;
mod threshold;

pub use history::{History, CAPACITY};
pub use monitor::{PerfMonitor, PlatformOptimizer};
pub use sample::{Collector, Sample};
pub use threshold::{recommendations, MetricKind, Threshold, DEFAULT_THRESHOLDS};
