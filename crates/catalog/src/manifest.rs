// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest parsing: extracts explicit dependency declarations
//! from the manifest files an app ships. Each parser is deliberately
//! tolerant — a manifest an app analyzer can't fully understand still
//! yields whatever dependency lines it could recognize, rather than failing
//! the whole analysis.

use pinokio_core::profile::Deps;
use std::path::Path;

/// Returns the bare package name of a manifest entry, stripping any version
/// specifier (`torch==2.1.0` -> `torch`). Dependency entries keep their
/// version specifiers intact; callers that only care about identity (the
/// dependency orchestrator's manager/system/dependency conflict checks,
/// resource estimation) go through this instead of re-parsing.
pub fn package_name(entry: &str) -> &str {
    let cut = entry
        .find(|c: char| matches!(c, '=' | '<' | '>' | '!' | '~' | ';' | '['))
        .unwrap_or(entry.len());
    entry[..cut].trim()
}

fn parse_requirements_txt(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .map(str::to_string)
        .collect()
}

fn parse_package_json(content: &str) -> Vec<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(content) else {
        return Vec::new();
    };
    let mut names = Vec::new();
    for key in ["dependencies", "devDependencies"] {
        if let Some(obj) = value.get(key).and_then(|v| v.as_object()) {
            names.extend(obj.keys().cloned());
        }
    }
    names
}

/// Parses a conda `environment.yml`/`environment.yaml`. Top-level
/// `dependencies:` list entries become `conda` deps; entries under a nested
/// `- pip:` block become `pip` deps. This is a line-oriented heuristic, not
/// a full YAML parser — it covers the conventional two-level shape these
/// files actually use in practice.
fn parse_environment_yml(content: &str) -> (Vec<String>, Vec<String>) {
    let mut conda = Vec::new();
    let mut pip = Vec::new();
    let mut in_pip_block = false;

    for line in content.lines() {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if trimmed.starts_with("- pip:") {
            in_pip_block = true;
            continue;
        }
        if !trimmed.starts_with('-') {
            continue;
        }
        let entry = trimmed.trim_start_matches('-').trim();
        if entry.is_empty() || entry == "pip" {
            continue;
        }
        if in_pip_block && indent >= 4 {
            pip.push(entry.to_string());
        } else {
            in_pip_block = false;
            conda.push(entry.to_string());
        }
    }

    (conda, pip)
}

fn parse_pyproject_toml(content: &str) -> Vec<String> {
    let Ok(doc) = toml::from_str::<toml::Value>(content) else {
        return Vec::new();
    };
    let mut names = Vec::new();
    if let Some(project) = doc.get("project").and_then(|v| v.as_table()) {
        if let Some(deps) = project.get("dependencies").and_then(|v| v.as_array()) {
            names.extend(deps.iter().filter_map(|v| v.as_str()).map(str::to_string));
        }
    }
    if let Some(poetry) = doc
        .get("tool")
        .and_then(|v| v.as_table())
        .and_then(|t| t.get("poetry"))
        .and_then(|v| v.as_table())
        .and_then(|t| t.get("dependencies"))
        .and_then(|v| v.as_table())
    {
        names.extend(poetry.keys().filter(|k| *k != "python").cloned());
    }
    names
}

/// Extracts `Deps` from the recognized manifest files found directly under
/// `root`. Missing files are skipped; malformed ones contribute
/// nothing rather than failing analysis.
pub async fn extract_deps(root: &Path) -> Deps {
    let mut deps = Deps::default();

    if let Ok(content) = tokio::fs::read_to_string(root.join("requirements.txt")).await {
        deps.pip.extend(parse_requirements_txt(&content));
    }
    if let Ok(content) = tokio::fs::read_to_string(root.join("package.json")).await {
        deps.npm.extend(parse_package_json(&content));
    }
    for name in ["environment.yml", "environment.yaml"] {
        if let Ok(content) = tokio::fs::read_to_string(root.join(name)).await {
            let (conda, pip) = parse_environment_yml(&content);
            deps.conda.extend(conda);
            deps.pip.extend(pip);
            break;
        }
    }
    if let Ok(content) = tokio::fs::read_to_string(root.join("pyproject.toml")).await {
        deps.pip.extend(parse_pyproject_toml(&content));
    }

    deps.pip = dedup_by_name(deps.pip);
    deps.conda = dedup_by_name(deps.conda);
    deps.npm = dedup_by_name(deps.npm);
    deps
}

fn dedup_by_name(mut entries: Vec<String>) -> Vec<String> {
    entries.sort_by(|a, b| package_name(a).cmp(package_name(b)));
    entries.dedup_by(|a, b| package_name(a) == package_name(b));
    entries
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
