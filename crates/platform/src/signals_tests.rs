use super::*;

#[test]
fn no_signals_yields_unknown() {
    let (kind, conf, evidence) = score(&[]);
    assert_eq!(kind, PlatformKind::Unknown);
    assert_eq!(conf, 0.0);
    assert!(evidence.is_empty());
}

#[test]
fn single_weak_signal_stays_below_threshold() {
    let signals = vec![Signal { platform: PlatformKind::Vast, weight: 0.2, evidence: "weak" }];
    let (kind, _, _) = score(&signals);
    assert_eq!(kind, PlatformKind::Unknown);
}

#[test]
fn accumulated_signals_cross_threshold() {
    let signals = vec![
        Signal { platform: PlatformKind::Colab, weight: 0.2, evidence: "a" },
        Signal { platform: PlatformKind::Colab, weight: 0.2, evidence: "b" },
    ];
    let (kind, conf, evidence) = score(&signals);
    assert_eq!(kind, PlatformKind::Colab);
    assert!((conf - 0.4).abs() < f32::EPSILON);
    assert_eq!(evidence.len(), 2);
}

#[test]
fn higher_score_wins_over_more_signals() {
    let signals = vec![
        Signal { platform: PlatformKind::Colab, weight: 0.6, evidence: "strong" },
        Signal { platform: PlatformKind::Vast, weight: 0.2, evidence: "a" },
        Signal { platform: PlatformKind::Vast, weight: 0.1, evidence: "b" },
    ];
    let (kind, _, _) = score(&signals);
    assert_eq!(kind, PlatformKind::Colab);
}

#[test]
fn tie_broken_by_signal_count() {
    let signals = vec![
        Signal { platform: PlatformKind::Colab, weight: 0.5, evidence: "a" },
        Signal { platform: PlatformKind::Vast, weight: 0.25, evidence: "b" },
        Signal { platform: PlatformKind::Vast, weight: 0.25, evidence: "c" },
    ];
    let (kind, _, evidence) = score(&signals);
    assert_eq!(kind, PlatformKind::Vast);
    assert_eq!(evidence.len(), 2);
}
