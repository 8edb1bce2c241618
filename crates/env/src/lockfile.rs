// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lockfile hashing: a stable digest of an app's dependency set,
//! used to detect when an existing environment has drifted from the
//! manifest that created it.

use pinokio_core::profile::Deps;
use sha2::{Digest, Sha256};

/// Computes a stable hex digest of `deps`. Each dependency list is sorted
/// before hashing so the result doesn't depend on manifest ordering.
pub fn lockfile_hash(deps: &Deps) -> String {
    let mut hasher = Sha256::new();
    for (label, list) in [("pip", &deps.pip), ("conda", &deps.conda), ("npm", &deps.npm), ("system", &deps.system)] {
        let mut sorted = list.clone();
        sorted.sort();
        hasher.update(label.as_bytes());
        hasher.update([0u8]);
        for entry in sorted {
            hasher.update(entry.as_bytes());
            hasher.update([0u8]);
        }
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
#[path = "lockfile_tests.rs"]
mod tests;
