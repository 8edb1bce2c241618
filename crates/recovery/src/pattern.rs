// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error pattern table: what a log line or health event looks like, and
//! which recovery actions to try when it matches.

use crate::action::RecoveryAction;
use pinokio_core::AlertSeverity;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    Dependency,
    Process,
    Network,
    Storage,
    Permission,
    Config,
    Resource,
    Platform,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPattern {
    pub id: String,
    pub name: String,
    pub category: PatternCategory,
    pub severity: AlertSeverity,
    /// Compiled lazily in [`ErrorPattern::matches`]; stored as source text
    /// so the pattern itself stays `Serialize`/`Deserialize` for the
    /// `recovery.patterns.list/add/remove` RPC surface.
    pub regexes: Vec<String>,
    pub keywords: Vec<String>,
    pub actions: Vec<RecoveryAction>,
    pub max_attempts: u32,
    pub cooldown: Duration,
}

impl ErrorPattern {
    /// Whether `line` matches this pattern: any keyword substring
    /// (case-insensitive) or any regex. An invalid regex is skipped with a
    /// warning rather than failing the whole match, since one bad
    /// `recovery.patterns.add` entry must not blind matching for every
    /// other pattern.
    pub fn matches(&self, line: &str) -> bool {
        let lower = line.to_ascii_lowercase();
        if self.keywords.iter().any(|k| lower.contains(&k.to_ascii_lowercase())) {
            return true;
        }
        self.regexes.iter().any(|pattern| match Regex::new(pattern) {
            Ok(re) => re.is_match(line),
            Err(e) => {
                tracing::warn!(pattern_id = %self.id, %pattern, error = %e, "invalid recovery pattern regex");
                false
            }
        })
    }
}

/// The built-in pattern table, covering the categories named in spec.md
/// §4.L. Operators extend this via `recovery.patterns.add`.
pub fn default_patterns() -> Vec<ErrorPattern> {
    vec![
        ErrorPattern {
            id: "dep-module-not-found".to_string(),
            name: "missing Python/Node module".to_string(),
            category: PatternCategory::Dependency,
            severity: AlertSeverity::Medium,
            regexes: vec![r"(?i)modulenotfounderror".to_string(), r"(?i)cannot find module".to_string()],
            keywords: vec!["no module named".to_string()],
            actions: vec![RecoveryAction::ReinstallDependencies, RecoveryAction::RestartApplication],
            max_attempts: 3,
            cooldown: Duration::from_secs(300),
        },
        ErrorPattern {
            id: "process-crash-loop".to_string(),
            name: "process exiting immediately".to_string(),
            category: PatternCategory::Process,
            severity: AlertSeverity::High,
            regexes: vec![],
            keywords: vec!["segmentation fault".to_string(), "core dumped".to_string()],
            actions: vec![RecoveryAction::RestartApplication, RecoveryAction::ResetEnvironment],
            max_attempts: 2,
            cooldown: Duration::from_secs(600),
        },
        ErrorPattern {
            id: "network-connection-refused".to_string(),
            name: "tunnel or upstream unreachable".to_string(),
            category: PatternCategory::Network,
            severity: AlertSeverity::Medium,
            regexes: vec![r"(?i)connection refused".to_string(), r"(?i)could not connect".to_string()],
            keywords: vec![],
            actions: vec![RecoveryAction::RestartTunnels],
            max_attempts: 5,
            cooldown: Duration::from_secs(120),
        },
        ErrorPattern {
            id: "storage-disk-full".to_string(),
            name: "disk space exhausted".to_string(),
            category: PatternCategory::Storage,
            severity: AlertSeverity::Critical,
            regexes: vec![r"(?i)no space left on device".to_string()],
            keywords: vec!["enospc".to_string()],
            actions: vec![RecoveryAction::ClearCache],
            max_attempts: 1,
            cooldown: Duration::from_secs(900),
        },
        ErrorPattern {
            id: "permission-denied".to_string(),
            name: "filesystem permission error".to_string(),
            category: PatternCategory::Permission,
            severity: AlertSeverity::Medium,
            regexes: vec![r"(?i)permission denied".to_string(), r"(?i)eacces".to_string()],
            keywords: vec![],
            actions: vec![RecoveryAction::FixPermissions],
            max_attempts: 2,
            cooldown: Duration::from_secs(300),
        },
        ErrorPattern {
            id: "config-invalid".to_string(),
            name: "malformed configuration".to_string(),
            category: PatternCategory::Config,
            severity: AlertSeverity::Low,
            regexes: vec![r"(?i)invalid configuration".to_string(), r"(?i)failed to parse config".to_string()],
            keywords: vec![],
            actions: vec![RecoveryAction::ResetEnvironment],
            max_attempts: 1,
            cooldown: Duration::from_secs(3600),
        },
        ErrorPattern {
            id: "resource-out-of-memory".to_string(),
            name: "process killed for memory pressure".to_string(),
            category: PatternCategory::Resource,
            severity: AlertSeverity::Critical,
            regexes: vec![r"(?i)out of memory".to_string(), r"(?i)killed process".to_string()],
            keywords: vec!["oom".to_string()],
            actions: vec![RecoveryAction::IncreaseMemory, RecoveryAction::RestartApplication],
            max_attempts: 2,
            cooldown: Duration::from_secs(600),
        },
        ErrorPattern {
            id: "platform-gpu-unavailable".to_string(),
            name: "GPU driver or device unavailable".to_string(),
            category: PatternCategory::Platform,
            severity: AlertSeverity::High,
            regexes: vec![r"(?i)cuda error".to_string(), r"(?i)no cuda-capable device".to_string()],
            keywords: vec![],
            actions: vec![RecoveryAction::RestartDaemon],
            max_attempts: 1,
            cooldown: Duration::from_secs(1800),
        },
    ]
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
