use super::*;
use crate::action::RecoveryAction;
use chrono::Utc;

fn attempt(pattern_id: &str, succeeded: bool) -> RecoveryAttempt {
    RecoveryAttempt {
        pattern_id: pattern_id.to_string(),
        app_id: Some(pinokio_core::AppId::new("app-x")),
        action: RecoveryAction::RestartApplication,
        succeeded,
        at: Utc::now(),
    }
}

#[tokio::test]
async fn fresh_history_has_no_cooldown() {
    let dir = tempfile::tempdir().expect("tempdir");
    let history = History::new(dir.path());
    assert!(!history.in_cooldown("p1", std::time::Duration::from_secs(60), Utc::now()));
}

#[tokio::test]
async fn recording_an_attempt_starts_its_cooldown() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut history = History::new(dir.path());
    history.record(attempt("p1", true)).await.expect("record");
    assert!(history.in_cooldown("p1", std::time::Duration::from_secs(3600), Utc::now()));
}

#[tokio::test]
async fn attempts_in_window_counts_toward_max_attempts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut history = History::new(dir.path());
    for _ in 0..3 {
        history.record(attempt("p1", false)).await.expect("record");
    }
    assert_eq!(history.attempts_in_window("p1", Utc::now()), 3);
}

#[tokio::test]
async fn history_persists_and_reloads() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let mut history = History::new(dir.path());
        history.record(attempt("p1", true)).await.expect("record");
    }
    let mut reloaded = History::new(dir.path());
    reloaded.load().await.expect("load");
    assert_eq!(reloaded.attempts().len(), 1);
    assert!(reloaded.in_cooldown("p1", std::time::Duration::from_secs(3600), Utc::now()));
}

#[tokio::test]
async fn stats_tally_success_and_failure_by_pattern() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut history = History::new(dir.path());
    history.record(attempt("p1", true)).await.expect("record");
    history.record(attempt("p1", false)).await.expect("record");
    history.record(attempt("p2", true)).await.expect("record");
    let stats = history.stats();
    assert_eq!(stats.total_attempts, 3);
    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.by_pattern.get("p1"), Some(&2));
}
