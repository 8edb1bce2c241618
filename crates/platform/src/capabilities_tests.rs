use super::*;
use pinokio_core::platform::{PlatformCaps, PlatformKind};
use std::path::PathBuf;

fn test_platform(features: PlatformFeatures) -> Platform {
    Platform {
        kind: PlatformKind::Unknown,
        base_path: PathBuf::from("/tmp"),
        caps: PlatformCaps { max_mem_gb: 8.0, max_disk_gb: 32.0, max_cpu: 4.0, max_gpu: 0, session_ttl_s: 0, idle_ttl_s: 0 },
        features,
        confidence: 0.0,
        detection_evidence: Vec::new(),
    }
}

#[test]
fn all_required_features_present_is_ok() {
    let platform = test_platform(PlatformFeatures::GPU | PlatformFeatures::SSH);
    let report = validate_capabilities(&platform, PlatformFeatures::GPU);
    assert!(report.ok);
    assert!(report.missing.is_empty());
}

#[test]
fn missing_feature_is_reported_not_an_error() {
    let platform = test_platform(PlatformFeatures::SSH);
    let report = validate_capabilities(&platform, PlatformFeatures::GPU | PlatformFeatures::DOCKER);
    assert!(!report.ok);
    assert_eq!(report.missing, vec!["gpu".to_string(), "docker".to_string()]);
}

#[test]
fn empty_requirement_is_always_ok() {
    let platform = test_platform(PlatformFeatures::empty());
    let report = validate_capabilities(&platform, PlatformFeatures::empty());
    assert!(report.ok);
}
