use super::*;
use serial_test::serial;

#[test]
#[serial]
fn colab_signals_detect_colab_with_drive_mount() {
    std::env::set_var("COLAB_GPU", "1");
    std::env::set_var("COLAB_RELEASE_TAG", "release-colab-20260101");
    let platform = detect();
    std::env::remove_var("COLAB_GPU");
    std::env::remove_var("COLAB_RELEASE_TAG");

    assert_eq!(platform.kind, PlatformKind::Colab);
    assert!(platform.confidence >= 0.6, "confidence was {}", platform.confidence);
    assert!(platform.has_feature(PlatformFeatures::DRIVE_MOUNT));
    assert_eq!(platform.base_path, PathBuf::from("/content/pinokio"));
}

#[test]
#[serial]
fn no_signals_is_unknown_with_zero_confidence() {
    for var in ["COLAB_GPU", "COLAB_RELEASE_TAG", "VAST_CONTAINERLABEL", "LIGHTNING_CLOUD_URL", "PAPERSPACE_METRIC_WORKLOAD_ID", "RUNPOD_POD_ID"] {
        std::env::remove_var(var);
    }
    let platform = detect();
    assert_eq!(platform.kind, PlatformKind::Unknown);
    assert_eq!(platform.confidence, 0.0);
}

#[test]
#[serial]
fn vast_env_detects_vast_with_docker_and_ssh() {
    std::env::set_var("VAST_CONTAINERLABEL", "C.123456");
    let platform = detect();
    std::env::remove_var("VAST_CONTAINERLABEL");

    assert_eq!(platform.kind, PlatformKind::Vast);
    assert!(platform.has_feature(PlatformFeatures::SSH));
    assert!(platform.has_feature(PlatformFeatures::DOCKER));
}
