// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell/FS/JSON failure taxonomy: `NotFound | Permission |
//! Conflict | Timeout | Cancelled | Corrupt`. Callers receive this
//! structured value; nothing here swallows an error silently.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("not found: {0}")]
    NotFound(PathBuf),
    #[error("permission denied: {0}")]
    Permission(PathBuf),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("cancelled")]
    Cancelled,
    #[error("corrupt data at {path}: {message}")]
    Corrupt { path: PathBuf, message: String },
    #[error("io error: {0}")]
    Io(#[source] std::io::Error),
}

impl ShellError {
    pub fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ShellError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ShellError::Permission(path.to_path_buf()),
            _ => ShellError::Io(err),
        }
    }
}

impl From<ShellError> for pinokio_core::Error {
    fn from(err: ShellError) -> Self {
        use pinokio_core::ErrorKind;
        let kind = match &err {
            ShellError::NotFound(_) => ErrorKind::NotFound,
            ShellError::Permission(_) => ErrorKind::Permission,
            ShellError::Conflict(_) => ErrorKind::Conflict,
            ShellError::Timeout(_) => ErrorKind::Timeout,
            ShellError::Cancelled => ErrorKind::Cancelled,
            ShellError::Corrupt { .. } => ErrorKind::Corrupt,
            ShellError::Io(_) => ErrorKind::Internal,
        };
        pinokio_core::Error::new(kind, err.to_string()).with_cause(err)
    }
}
