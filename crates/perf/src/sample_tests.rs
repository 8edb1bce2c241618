// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::sample::Collector;

#[test]
fn sample_reports_plausible_percentages() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut collector = Collector::new(dir.path());

    let first = collector.sample();
    assert!((0.0..=100.0).contains(&first.mem_pct));
    assert!((0.0..=100.0).contains(&first.disk_pct));
    assert!(first.gpu_pct.is_none());

    // First CPU sample has no prior snapshot to diff against.
    assert_eq!(first.cpu_pct, 0.0);
}

#[test]
fn second_sample_uses_delta_against_first() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut collector = Collector::new(dir.path());

    let _ = collector.sample();
    let second = collector.sample();
    assert!((0.0..=100.0).contains(&second.cpu_pct));
}

#[test]
fn disk_usage_reflects_the_sampled_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut collector = Collector::new(dir.path());
    let sample = collector.sample();

    assert!(sample.disk_total_mb >= sample.disk_used_mb);
}

#[test]
fn process_count_is_nonzero_on_a_live_system() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut collector = Collector::new(dir.path());
    let sample = collector.sample();

    if cfg!(target_os = "linux") {
        assert!(sample.process_count > 0);
    }
}
