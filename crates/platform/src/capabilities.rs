// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability validation: checks a required feature set against
//! a detected platform. Never returns an error — an unresolvable capability
//! is reported as missing, since a caller asking "can I use the GPU" should
//! get an answer, not a failure to answer.

use pinokio_core::platform::{Platform, PlatformFeatures};
use serde::{Deserialize, Serialize};

/// Result of checking a required feature set against a platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityReport {
    pub ok: bool,
    pub missing: Vec<String>,
}

fn feature_name(feature: PlatformFeatures) -> &'static str {
    match feature {
        PlatformFeatures::GPU => "gpu",
        PlatformFeatures::DRIVE_MOUNT => "drive_mount",
        PlatformFeatures::SSH => "ssh",
        PlatformFeatures::DOCKER => "docker",
        PlatformFeatures::OUTBOUND_NETWORK => "outbound_network",
        _ => "unknown",
    }
}

const ALL_FEATURES: &[PlatformFeatures] = &[
    PlatformFeatures::GPU,
    PlatformFeatures::DRIVE_MOUNT,
    PlatformFeatures::SSH,
    PlatformFeatures::DOCKER,
    PlatformFeatures::OUTBOUND_NETWORK,
];

/// Reports which of `required`'s individual flags the platform lacks.
pub fn validate_capabilities(platform: &Platform, required: PlatformFeatures) -> CapabilityReport {
    let missing: Vec<String> = ALL_FEATURES
        .iter()
        .copied()
        .filter(|&flag| required.contains(flag) && !platform.has_feature(flag))
        .map(feature_name)
        .map(str::to_string)
        .collect();

    CapabilityReport { ok: missing.is_empty(), missing }
}

#[cfg(test)]
#[path = "capabilities_tests.rs"]
mod tests;
