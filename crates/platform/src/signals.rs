// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Weighted detection signals.

use pinokio_core::PlatformKind;
use std::path::Path;

/// One piece of detection evidence: which platform it favors, how strongly,
/// and a human-readable description for `Platform.detection_evidence`.
pub struct Signal {
    pub platform: PlatformKind,
    pub weight: f32,
    pub evidence: &'static str,
}

fn env_signal(var: &str, platform: PlatformKind, weight: f32, evidence: &'static str) -> Option<Signal> {
    std::env::var(var).ok().map(|_| Signal { platform, weight, evidence })
}

fn path_signal(path: &Path, platform: PlatformKind, weight: f32, evidence: &'static str) -> Option<Signal> {
    path.exists().then_some(Signal { platform, weight, evidence })
}

fn hostname_signal(
    hostname: &str,
    substring: &str,
    platform: PlatformKind,
    weight: f32,
    evidence: &'static str,
) -> Option<Signal> {
    hostname.to_ascii_lowercase().contains(substring).then_some(Signal { platform, weight, evidence })
}

/// Collects every signal that fires against the current process environment.
pub fn collect(hostname: &str) -> Vec<Signal> {
    let mut signals = Vec::new();

    signals.extend(env_signal("COLAB_GPU", PlatformKind::Colab, 0.5, "COLAB_GPU env var set"));
    signals.extend(env_signal(
        "COLAB_RELEASE_TAG",
        PlatformKind::Colab,
        0.3,
        "COLAB_RELEASE_TAG env var set",
    ));
    signals.extend(path_signal(Path::new("/content"), PlatformKind::Colab, 0.3, "/content exists"));
    signals.extend(path_signal(
        Path::new("/usr/local/lib/python3.10/dist-packages/google/colab"),
        PlatformKind::Colab,
        0.2,
        "google.colab module installed",
    ));

    signals.extend(env_signal(
        "VAST_CONTAINERLABEL",
        PlatformKind::Vast,
        0.5,
        "VAST_CONTAINERLABEL env var set",
    ));
    signals.extend(hostname_signal(hostname, "vast", PlatformKind::Vast, 0.3, "hostname contains 'vast'"));

    signals.extend(env_signal(
        "LIGHTNING_CLOUD_URL",
        PlatformKind::Lightning,
        0.5,
        "LIGHTNING_CLOUD_URL env var set",
    ));
    signals.extend(hostname_signal(
        hostname,
        "lightning",
        PlatformKind::Lightning,
        0.2,
        "hostname contains 'lightning'",
    ));

    signals.extend(env_signal(
        "PAPERSPACE_METRIC_WORKLOAD_ID",
        PlatformKind::Paperspace,
        0.5,
        "PAPERSPACE_METRIC_WORKLOAD_ID env var set",
    ));
    signals.extend(path_signal(
        Path::new("/notebooks"),
        PlatformKind::Paperspace,
        0.2,
        "/notebooks exists",
    ));

    signals.extend(env_signal("RUNPOD_POD_ID", PlatformKind::Runpod, 0.5, "RUNPOD_POD_ID env var set"));
    signals.extend(hostname_signal(
        hostname,
        "runpod",
        PlatformKind::Runpod,
        0.3,
        "hostname contains 'runpod'",
    ));

    signals
}

/// Accumulates signal weights per platform, returning `(winner, score,
/// signal_count, evidence)`. If the highest score does not exceed 0.3, or no
/// signal fired at all, the winner is `Unknown`.
pub fn score(signals: &[Signal]) -> (PlatformKind, f32, Vec<String>) {
    use std::collections::HashMap;
    let mut totals: HashMap<PlatformKind, (f32, usize, Vec<&'static str>)> = HashMap::new();
    for s in signals {
        let entry = totals.entry(s.platform).or_insert((0.0, 0, Vec::new()));
        entry.0 += s.weight;
        entry.1 += 1;
        entry.2.push(s.evidence);
    }

    let winner = totals
        .iter()
        .max_by(|a, b| {
            a.1 .0
                .partial_cmp(&b.1 .0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1 .1.cmp(&b.1 .1))
        })
        .map(|(k, v)| (*k, v.0, v.2.clone()));

    match winner {
        Some((kind, score, evidence)) if score > 0.3 => {
            (kind, score, evidence.into_iter().map(str::to_string).collect())
        }
        _ => (PlatformKind::Unknown, 0.0, Vec::new()),
    }
}

#[cfg(test)]
#[path = "signals_tests.rs"]
mod tests;
