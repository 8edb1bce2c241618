use super::*;

fn check(status: HealthStatus) -> CheckStatus {
    CheckStatus { status, ..CheckStatus::unknown() }
}

#[test]
fn aggregate_picks_worst_of_several_checks() {
    let mut record = HealthRecord::new(true, 3);
    record.checks.insert("process".into(), check(HealthStatus::Healthy));
    record.checks.insert("http".into(), check(HealthStatus::Critical));
    record.checks.insert("tcp".into(), check(HealthStatus::Degraded));
    record.aggregate();
    assert_eq!(record.overall, HealthStatus::Critical);
}

#[test]
fn adding_healthy_check_never_worsens_overall() {
    let mut record = HealthRecord::new(true, 3);
    record.checks.insert("a".into(), check(HealthStatus::Unhealthy));
    record.aggregate();
    let before = record.overall;
    record.checks.insert("b".into(), check(HealthStatus::Healthy));
    record.aggregate();
    assert!(record.overall.severity_le(before));
}

#[test]
fn adding_unhealthy_check_never_improves_overall() {
    let mut record = HealthRecord::new(true, 3);
    record.checks.insert("a".into(), check(HealthStatus::Healthy));
    record.aggregate();
    let before = record.overall;
    record.checks.insert("b".into(), check(HealthStatus::Unhealthy));
    record.aggregate();
    assert!(!record.overall.severity_le(before) || record.overall == before);
}

#[test]
fn failure_threshold_promotes_degraded_to_unhealthy() {
    let mut record = HealthRecord::new(true, 3);
    record.checks.insert("a".into(), check(HealthStatus::Degraded));
    record.aggregate();
    record.consecutive_failures = 3;
    record.apply_thresholds(3, 2);
    assert_eq!(record.overall, HealthStatus::Unhealthy);
}

#[test]
fn success_threshold_resets_to_healthy() {
    let mut record = HealthRecord::new(true, 3);
    record.overall = HealthStatus::Unhealthy;
    record.consecutive_successes = 2;
    record.apply_thresholds(3, 2);
    assert_eq!(record.overall, HealthStatus::Healthy);
}
