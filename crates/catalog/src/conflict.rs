// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dependency orchestrator: detects four conflict kinds
//! across an app's `Deps`, scores their severity, and proposes (but never
//! silently applies) a resolution strategy. Grounded on `oj-runbook`'s
//! `import::merge` conflict reporting shape (`ImportWarning`-style
//! collect-then-report, never a silent overwrite), generalized from
//! HCL-symbol conflicts to package-manager conflicts.

use crate::manifest::package_name;
use pinokio_core::profile::Deps;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Same logical package declared by more than one manager.
    Version,
    /// A package known hostile when co-installed across managers.
    Manager,
    /// Mutually exclusive system packages both requested.
    System,
    /// A known antagonistic pair of packages, regardless of manager.
    Dependency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    UseLatest,
    UseSpecific(String),
    Prioritize(String),
    SkipConflicting,
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub package: String,
    pub severity: Severity,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorReport {
    pub found: Vec<Conflict>,
    pub resolved: Vec<(Conflict, ResolutionStrategy)>,
    pub remaining: Vec<Conflict>,
    pub elapsed: Duration,
}

const CRITICAL_SUBSTRINGS: &[&str] = &["python", "node", "npm", "pip", "conda"];
const HIGH_SUBSTRINGS: &[&str] = &["torch", "tensorflow", "numpy", "pandas"];
const MEDIUM_SUBSTRINGS: &[&str] = &["cuda", "opencv", "ffmpeg"];

/// Cross-manager denylist: a package known to cause trouble when installed
/// by more than one manager at once.
const MANAGER_DENYLIST: &[&str] = &["numpy", "torch", "tensorflow", "pillow"];

/// Mutually exclusive system package pairs.
const SYSTEM_EXCLUSIVE_PAIRS: &[(&str, &str)] =
    &[("python2", "python3"), ("mysql-server", "mariadb-server"), ("ffmpeg", "ffmpeg-free")];

/// Known antagonistic dependency pairs regardless of manager.
const DEPENDENCY_ANTAGONISTS: &[(&str, &str)] = &[("tensorflow", "torch"), ("pyqt5", "pyside2")];

fn severity_for(package: &str) -> Severity {
    let lower = package.to_ascii_lowercase();
    if CRITICAL_SUBSTRINGS.iter().any(|s| lower.contains(s)) {
        Severity::Critical
    } else if HIGH_SUBSTRINGS.iter().any(|s| lower.contains(s)) {
        Severity::High
    } else if MEDIUM_SUBSTRINGS.iter().any(|s| lower.contains(s)) {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn resolution_for(kind: ConflictKind, severity: Severity) -> ResolutionStrategy {
    if severity == Severity::Critical {
        return ResolutionStrategy::Manual;
    }
    match kind {
        ConflictKind::Version => ResolutionStrategy::UseLatest,
        ConflictKind::Manager => ResolutionStrategy::Prioritize("pip".to_string()),
        ConflictKind::System => ResolutionStrategy::SkipConflicting,
        ConflictKind::Dependency => ResolutionStrategy::Manual,
    }
}

/// Detects and (where safe) resolves dependency conflicts in `deps`. Never
/// mutates `deps` — the caller applies resolutions itself, after logging the
/// intended action.
pub struct DependencyOrchestrator;

impl DependencyOrchestrator {
    pub fn analyze(deps: &Deps, elapsed: Duration) -> OrchestratorReport {
        let mut found = Vec::new();

        found.extend(Self::version_conflicts(deps));
        found.extend(Self::manager_conflicts(deps));
        found.extend(Self::system_conflicts(deps));
        found.extend(Self::dependency_conflicts(deps));

        let mut resolved = Vec::new();
        let mut remaining = Vec::new();
        for conflict in found.iter().cloned() {
            if conflict.severity == Severity::Critical {
                remaining.push(conflict);
                continue;
            }
            let strategy = resolution_for(conflict.kind, conflict.severity);
            resolved.push((conflict, strategy));
        }

        OrchestratorReport { found, resolved, remaining, elapsed }
    }

    fn version_conflicts(deps: &Deps) -> Vec<Conflict> {
        use std::collections::HashMap;
        let mut by_name: HashMap<&str, Vec<&str>> = HashMap::new();
        for (manager, list) in [("pip", &deps.pip), ("conda", &deps.conda), ("npm", &deps.npm)] {
            for entry in list {
                by_name.entry(package_name(entry)).or_default().push(manager);
            }
        }
        by_name
            .into_iter()
            .filter(|(_, managers)| managers.len() > 1)
            .map(|(name, managers)| Conflict {
                kind: ConflictKind::Version,
                package: name.to_string(),
                severity: severity_for(name),
                detail: format!("declared by multiple managers: {}", managers.join(", ")),
            })
            .collect()
    }

    fn manager_conflicts(deps: &Deps) -> Vec<Conflict> {
        let mut conflicts = Vec::new();
        for denied in MANAGER_DENYLIST {
            let count = [&deps.pip, &deps.conda, &deps.npm]
                .iter()
                .filter(|list| list.iter().any(|entry| package_name(entry).eq_ignore_ascii_case(denied)))
                .count();
            if count > 1 {
                conflicts.push(Conflict {
                    kind: ConflictKind::Manager,
                    package: denied.to_string(),
                    severity: severity_for(denied),
                    detail: format!("{denied} is denylisted for cross-manager install"),
                });
            }
        }
        conflicts
    }

    fn system_conflicts(deps: &Deps) -> Vec<Conflict> {
        SYSTEM_EXCLUSIVE_PAIRS
            .iter()
            .filter(|(a, b)| {
                deps.system.iter().any(|e| package_name(e).eq_ignore_ascii_case(a))
                    && deps.system.iter().any(|e| package_name(e).eq_ignore_ascii_case(b))
            })
            .map(|(a, b)| Conflict {
                kind: ConflictKind::System,
                package: format!("{a}/{b}"),
                severity: Severity::High,
                detail: format!("{a} and {b} are mutually exclusive system packages"),
            })
            .collect()
    }

    fn dependency_conflicts(deps: &Deps) -> Vec<Conflict> {
        let all: Vec<&str> = deps.pip.iter().chain(&deps.conda).chain(&deps.npm).map(|e| package_name(e)).collect();
        DEPENDENCY_ANTAGONISTS
            .iter()
            .filter(|(a, b)| {
                all.iter().any(|e| e.eq_ignore_ascii_case(a)) && all.iter().any(|e| e.eq_ignore_ascii_case(b))
            })
            .map(|(a, b)| Conflict {
                kind: ConflictKind::Dependency,
                package: format!("{a}/{b}"),
                severity: severity_for(a).max(severity_for(b)),
                detail: format!("{a} and {b} are known to conflict when both installed"),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "conflict_tests.rs"]
mod tests;
