use super::*;
use crate::FakeClock;

#[test]
fn absent_may_only_advance_to_analyzing() {
    assert!(AppState::Absent.validate_transition(AppState::Analyzing).is_ok());
    assert!(AppState::Absent.validate_transition(AppState::Running).is_err());
}

#[test]
fn failed_is_reachable_from_any_nonterminal_state() {
    for state in [
        AppState::Analyzing,
        AppState::Installing,
        AppState::Running,
        AppState::Degraded,
        AppState::Stopping,
    ] {
        assert!(state.validate_transition(AppState::Failed).is_ok());
    }
}

#[test]
fn running_oscillates_with_degraded() {
    assert!(AppState::Running.validate_transition(AppState::Degraded).is_ok());
    assert!(AppState::Degraded.validate_transition(AppState::Running).is_ok());
}

#[test]
fn record_transition_stamps_installed_at_once() {
    let clock = FakeClock::new();
    let mut record = AppStateRecord::new(crate::AppId::new("demo"));
    record.transition(AppState::Analyzing, &clock).expect("analyzing");
    record.transition(AppState::Installing, &clock).expect("installing");
    record.transition(AppState::Installed, &clock).expect("installed");
    let first_stamp = record.installed_at;
    assert!(first_stamp.is_some());

    clock.advance(std::time::Duration::from_secs(10));
    record.transition(AppState::Starting, &clock).expect("starting");
    record.transition(AppState::Running, &clock).expect("running");
    assert_eq!(record.installed_at, first_stamp, "installed_at is stamped once");
    assert!(record.last_run_at.unwrap() > first_stamp.unwrap());
}

#[test]
fn record_rejects_illegal_transition() {
    let clock = FakeClock::new();
    let mut record = AppStateRecord::new(crate::AppId::new("demo"));
    let err = record.transition(AppState::Running, &clock).unwrap_err();
    assert_eq!(err.kind, crate::ErrorKind::Precondition);
}
