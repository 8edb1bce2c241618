// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The disk cache layer: `cache/disk/<kind>/<hex16>.{json|bin}`.
//! Writes go through [`pinokio_shell::fs::atomic_write`]; the hex filename
//! is a truncated SHA-256 of the [`CacheKey`] so keys of arbitrary length
//! and character set map to a safe, fixed-width filename.

use crate::value::CacheValue;
use pinokio_core::{CacheKey, CacheKind, Error};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

pub fn file_stem(key: &CacheKey) -> String {
    let digest = Sha256::digest(key.as_str().as_bytes());
    digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
}

fn kind_dir(root: &Path, kind: CacheKind) -> PathBuf {
    root.join(kind.dir_name())
}

pub async fn write(root: &Path, key: &CacheKey, kind: CacheKind, value: &CacheValue) -> Result<PathBuf, Error> {
    let dir = kind_dir(root, kind);
    let path = dir.join(format!("{}.{}", file_stem(key), value.extension()));
    let bytes = match value {
        CacheValue::Json(v) => serde_json::to_vec_pretty(v).map_err(|e| Error::corrupt(e.to_string()))?,
        CacheValue::Blob(b) => b.clone(),
    };
    pinokio_shell::fs::atomic_write(&path, &bytes).await.map_err(Error::from)?;
    Ok(path)
}

pub async fn read(root: &Path, key: &CacheKey, kind: CacheKind, as_json: bool) -> Result<Option<CacheValue>, Error> {
    let ext = if as_json { "json" } else { "bin" };
    let path = kind_dir(root, kind).join(format!("{}.{ext}", file_stem(key)));
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            if as_json {
                let v: serde_json::Value =
                    serde_json::from_slice(&bytes).map_err(|e| Error::corrupt(e.to_string()))?;
                Ok(Some(CacheValue::Json(v)))
            } else {
                Ok(Some(CacheValue::Blob(bytes)))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::from(pinokio_shell::error::ShellError::from_io(&path, e))),
    }
}

pub async fn remove(root: &Path, key: &CacheKey, kind: CacheKind) -> Result<(), Error> {
    for ext in ["json", "bin"] {
        let path = kind_dir(root, kind).join(format!("{}.{ext}", file_stem(key)));
        pinokio_shell::fs::remove_tree(&path).await.map_err(Error::from)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_is_stable_hex16() {
        let key = CacheKey::new("app_metadata:gradio-demo");
        let stem = file_stem(&key);
        assert_eq!(stem.len(), 16);
        assert_eq!(stem, file_stem(&key));
    }
}
