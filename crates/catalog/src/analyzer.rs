// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The app analyzer: walks an app's source tree once and
//! produces its cacheable `AppProfile`. Grounded on `oj-runbook`'s
//! library-resolution pass (read every file under a root once, fold the
//! results into a single merged value) adapted from HCL files to arbitrary
//! source trees.

use crate::classify::{classify_installer_kind, classify_ui_kind, file_names_at};
use crate::manifest::extract_deps;
use pinokio_core::id::AppId;
use pinokio_core::profile::{AppCategory, AppProfile, Complexity, ResourceEstimate};
use pinokio_core::Error;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;

const SCANNABLE_EXTENSIONS: &[&str] = &["py", "js", "ts", "ipynb"];
const MAX_SCAN_BYTES: u64 = 2 * 1024 * 1024;

fn is_scannable(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|ext| SCANNABLE_EXTENSIONS.contains(&ext))
}

fn estimate_complexity(deps: &pinokio_core::profile::Deps) -> Complexity {
    let total = deps.pip.len() + deps.conda.len() + deps.npm.len() + deps.system.len();
    match total {
        0..=3 => Complexity::Simple,
        4..=10 => Complexity::Moderate,
        11..=25 => Complexity::Complex,
        _ => Complexity::Advanced,
    }
}

fn estimate_resources(deps: &pinokio_core::profile::Deps) -> ResourceEstimate {
    let heavy_gpu = ["torch", "tensorflow", "jax"];
    let gpu_mem_mb =
        if deps.pip.iter().any(|d| heavy_gpu.contains(&crate::manifest::package_name(d))) { 6144 } else { 0 };
    let mem_mb = 512 + (deps.pip.len() + deps.conda.len() + deps.npm.len()) as u32 * 64;
    ResourceEstimate { mem_mb, disk_mb: mem_mb * 4, cpu: 1.0, gpu_mem_mb }
}

/// Caches `AppProfile`s keyed by source-tree hash so unchanged apps skip
/// re-analysis.
pub struct Analyzer {
    cache: Mutex<HashMap<AppId, String>>,
    profiles: Mutex<HashMap<String, AppProfile>>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self { cache: Mutex::new(HashMap::new()), profiles: Mutex::new(HashMap::new()) }
    }

    /// Analyzes the app rooted at `root`, returning a cached `AppProfile` if
    /// the source tree's hash hasn't changed since the last analysis.
    pub async fn analyze(&self, app_id: &AppId, root: &Path, category_hint: AppCategory) -> Result<AppProfile, Error> {
        let files = pinokio_shell::fs::walk(root)
            .await
            .map_err(|e| Error::new(pinokio_core::ErrorKind::NotFound, format!("walking {}: {e}", root.display())))?;

        let hash = hash_source_tree(root, &files).await;

        if let Some(cached_hash) = self.cache.lock().get(app_id).cloned() {
            if cached_hash == hash {
                if let Some(profile) = self.profiles.lock().get(&hash).cloned() {
                    return Ok(profile);
                }
            }
        }

        let file_names = file_names_at(root, &files);
        let installer_kind = classify_installer_kind(&file_names);

        let mut sources = Vec::new();
        for file in &files {
            if !is_scannable(file) {
                continue;
            }
            if let Ok(meta) = tokio::fs::metadata(file).await {
                if meta.len() > MAX_SCAN_BYTES {
                    continue;
                }
            }
            if let Ok(content) = tokio::fs::read_to_string(file).await {
                sources.push(content);
            }
        }
        let ui_kind = classify_ui_kind(&sources);

        let deps = extract_deps(root).await;
        let complexity = estimate_complexity(&deps);
        let resource_estimate = estimate_resources(&deps);
        let needs_tunnel = AppProfile::needs_tunnel_for(ui_kind);

        let profile = AppProfile {
            id: app_id.clone(),
            category: category_hint,
            complexity,
            installer_kind,
            ui_kind,
            port: None,
            share_default: false,
            deps,
            needs_tunnel,
            resource_estimate,
            hash: hash.clone(),
        };

        self.cache.lock().insert(app_id.clone(), hash.clone());
        self.profiles.lock().insert(hash, profile.clone());
        Ok(profile)
    }
}

async fn hash_source_tree(root: &Path, files: &[std::path::PathBuf]) -> String {
    let mut relative: Vec<&std::path::PathBuf> = files.iter().collect();
    relative.sort();

    let mut hasher = Sha256::new();
    for file in relative {
        let rel = file.strip_prefix(root).unwrap_or(file);
        hasher.update(rel.to_string_lossy().as_bytes());
        hasher.update([0u8]);
        if let Ok(bytes) = tokio::fs::read(file).await {
            hasher.update(&bytes);
        }
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod tests;
