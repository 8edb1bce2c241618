// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Safe filesystem operations: copy/move/remove/walk and atomic
//! write. Atomic write = write temp in the same directory, fsync, rename —
//! the building block every on-disk record relies on.

use crate::error::ShellError;
use std::path::{Path, PathBuf};

/// Directories skipped by `walk`.
pub const IGNORE_NAMES: &[&str] = &[".git", "node_modules", "__pycache__", ".venv", "venv", "env"];

fn is_ignored(name: &std::ffi::OsStr) -> bool {
    IGNORE_NAMES.iter().any(|ignored| name == std::ffi::OsStr::new(ignored))
}

/// Creates `path` and all missing parent directories.
pub async fn ensure_dir(path: &Path) -> Result<(), ShellError> {
    tokio::fs::create_dir_all(path).await.map_err(|e| ShellError::from_io(path, e))
}

/// Writes `contents` to `path` atomically: a temp file in the same
/// directory is written, fsynced, then renamed over the destination. A
/// reader never observes a partially-written file.
pub async fn atomic_write(path: &Path, contents: &[u8]) -> Result<(), ShellError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    ensure_dir(dir).await?;

    let tmp_name = format!(
        ".{}.tmp-{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("file"),
        nanoid_like()
    );
    let tmp_path = dir.join(tmp_name);

    let mut file = tokio::fs::File::create(&tmp_path).await.map_err(|e| ShellError::from_io(&tmp_path, e))?;
    use tokio::io::AsyncWriteExt;
    file.write_all(contents).await.map_err(|e| ShellError::from_io(&tmp_path, e))?;
    file.sync_all().await.map_err(|e| ShellError::from_io(&tmp_path, e))?;
    drop(file);

    tokio::fs::rename(&tmp_path, path).await.map_err(|e| ShellError::from_io(path, e))?;
    Ok(())
}

fn nanoid_like() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
    format!("{nanos:x}")
}

/// Copies a file or directory tree from `from` to `to`, skipping
/// [`IGNORE_NAMES`] entries.
pub async fn copy_tree(from: &Path, to: &Path) -> Result<(), ShellError> {
    let meta = tokio::fs::metadata(from).await.map_err(|e| ShellError::from_io(from, e))?;
    if meta.is_dir() {
        ensure_dir(to).await?;
        let mut entries = tokio::fs::read_dir(from).await.map_err(|e| ShellError::from_io(from, e))?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| ShellError::from_io(from, e))? {
            if is_ignored(&entry.file_name()) {
                continue;
            }
            Box::pin(copy_tree(&entry.path(), &to.join(entry.file_name()))).await?;
        }
    } else {
        if let Some(parent) = to.parent() {
            ensure_dir(parent).await?;
        }
        tokio::fs::copy(from, to).await.map_err(|e| ShellError::from_io(from, e))?;
    }
    Ok(())
}

/// Moves `from` to `to`, falling back to copy+remove across filesystems.
pub async fn move_path(from: &Path, to: &Path) -> Result<(), ShellError> {
    if let Some(parent) = to.parent() {
        ensure_dir(parent).await?;
    }
    match tokio::fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(_) => {
            copy_tree(from, to).await?;
            remove_tree(from).await
        }
    }
}

/// Removes a file or directory tree. Idempotent: removing an already-absent
/// path succeeds. Restores write permission on read-only entries before
/// removing them, since a naive `remove_dir_all` fails on read-only trees.
pub async fn remove_tree(path: &Path) -> Result<(), ShellError> {
    let meta = match tokio::fs::symlink_metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(ShellError::from_io(path, e)),
    };

    make_writable(path).await?;

    if meta.is_dir() {
        let mut entries = tokio::fs::read_dir(path).await.map_err(|e| ShellError::from_io(path, e))?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| ShellError::from_io(path, e))? {
            Box::pin(remove_tree(&entry.path())).await?;
        }
        match tokio::fs::remove_dir(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ShellError::from_io(path, e)),
        }
    } else {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ShellError::from_io(path, e)),
        }
    }
}

#[cfg(unix)]
async fn make_writable(path: &Path) -> Result<(), ShellError> {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(meta) = tokio::fs::metadata(path).await {
        let mut perms = meta.permissions();
        if perms.mode() & 0o200 == 0 {
            perms.set_mode(perms.mode() | 0o200);
            let _ = tokio::fs::set_permissions(path, perms).await;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn make_writable(path: &Path) -> Result<(), ShellError> {
    if let Ok(meta) = tokio::fs::metadata(path).await {
        let mut perms = meta.permissions();
        if perms.readonly() {
            perms.set_readonly(false);
            let _ = tokio::fs::set_permissions(path, perms).await;
        }
    }
    Ok(())
}

/// Recursively lists files under `root`, skipping [`IGNORE_NAMES`] dirs.
pub async fn walk(root: &Path) -> Result<Vec<PathBuf>, ShellError> {
    let mut out = Vec::new();
    walk_into(root, &mut out).await?;
    Ok(out)
}

fn walk_into<'a>(
    dir: &'a Path,
    out: &'a mut Vec<PathBuf>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), ShellError>> + 'a>> {
    Box::pin(async move {
        let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| ShellError::from_io(dir, e))?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| ShellError::from_io(dir, e))? {
            if is_ignored(&entry.file_name()) {
                continue;
            }
            let path = entry.path();
            let meta = entry.file_type().await.map_err(|e| ShellError::from_io(&path, e))?;
            if meta.is_dir() {
                walk_into(&path, out).await?;
            } else {
                out.push(path);
            }
        }
        Ok(())
    })
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
