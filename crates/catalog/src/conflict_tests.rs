use super::*;
use std::time::Duration;

#[test]
fn detects_version_conflict_across_managers() {
    let deps = Deps { pip: vec!["requests==2.0".to_string()], conda: vec!["requests=2.1".to_string()], ..Deps::default() };
    let report = DependencyOrchestrator::analyze(&deps, Duration::from_millis(5));
    assert!(report.found.iter().any(|c| c.kind == ConflictKind::Version && c.package == "requests"));
}

#[test]
fn critical_conflicts_are_never_auto_resolved() {
    let deps = Deps { pip: vec!["python==3.10".to_string()], conda: vec!["python=3.11".to_string()], ..Deps::default() };
    let report = DependencyOrchestrator::analyze(&deps, Duration::from_millis(5));
    let conflict = report.found.iter().find(|c| c.package == "python").expect("conflict");
    assert_eq!(conflict.severity, Severity::Critical);
    assert!(report.remaining.iter().any(|c| c.package == "python"));
    assert!(!report.resolved.iter().any(|(c, _)| c.package == "python"));
}

#[test]
fn detects_manager_denylist_conflict() {
    let deps = Deps { pip: vec!["numpy==1.26".to_string()], conda: vec!["numpy=1.25".to_string()], ..Deps::default() };
    let report = DependencyOrchestrator::analyze(&deps, Duration::from_millis(5));
    assert!(report.found.iter().any(|c| c.kind == ConflictKind::Manager && c.package == "numpy"));
}

#[test]
fn detects_system_exclusive_pair() {
    let deps = Deps { system: vec!["python2".to_string(), "python3".to_string()], ..Deps::default() };
    let report = DependencyOrchestrator::analyze(&deps, Duration::from_millis(5));
    assert!(report.found.iter().any(|c| c.kind == ConflictKind::System));
}

#[test]
fn detects_dependency_antagonist_pair() {
    let deps = Deps { pip: vec!["tensorflow==2.0".to_string(), "torch==2.1".to_string()], ..Deps::default() };
    let report = DependencyOrchestrator::analyze(&deps, Duration::from_millis(5));
    assert!(report.found.iter().any(|c| c.kind == ConflictKind::Dependency));
}

#[test]
fn no_conflicts_for_disjoint_deps() {
    let deps = Deps { pip: vec!["requests".to_string()], npm: vec!["lodash".to_string()], ..Deps::default() };
    let report = DependencyOrchestrator::analyze(&deps, Duration::from_millis(1));
    assert!(report.found.is_empty());
}

#[test]
fn low_severity_conflicts_get_a_non_manual_strategy() {
    let deps = Deps { pip: vec!["widget-a".to_string()], conda: vec!["widget-a".to_string()], ..Deps::default() };
    let report = DependencyOrchestrator::analyze(&deps, Duration::from_millis(1));
    let (_, strategy) = report.resolved.iter().find(|(c, _)| c.package == "widget-a").expect("resolved");
    assert_eq!(*strategy, ResolutionStrategy::UseLatest);
}
