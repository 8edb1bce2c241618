// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The app catalog: a list of known apps loaded from a JSON
//! artifact, read straight into a typed struct as a flat list rather than
//! an import graph of files, since the catalog has no cross-file
//! references to resolve.

use pinokio_core::profile::AppCategory;
use pinokio_core::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub category_hint: AppCategory,
    pub repo_url: String,
    pub installer_hint: String,
    #[serde(default)]
    pub stars: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Loads the catalog artifact from `path`.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            Error::new(pinokio_core::ErrorKind::NotFound, format!("reading catalog at {}: {e}", path.display()))
        })?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::corrupt(format!("catalog at {} is not valid JSON: {e}", path.display())))
    }

    pub fn find(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn search(&self, query: &str) -> Vec<&CatalogEntry> {
        let query = query.to_ascii_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                e.name.to_ascii_lowercase().contains(&query)
                    || e.tags.iter().any(|t| t.to_ascii_lowercase().contains(&query))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
