// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination with the
//! exit-code table spec §6 defines (`0` success, `2` invalid arguments,
//! `3` not found, `4` conflict, `5` precondition failed, `6` timeout, `1`
//! everything else).

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Builds an `ExitError` from a `Response::Error` frame, mapping the
    /// wire-carried `ErrorKind` to its exit code and printing the kind,
    /// message, and stable code (the closest thing to a correlation id
    /// this protocol carries) the way spec §7 asks the CLI to.
    pub fn from_response(kind: pinokio_core::ErrorKind, message: String, code: Option<String>) -> Self {
        let rendered = match code {
            Some(code) => format!("{kind}: {message} [{code}]"),
            None => format!("{kind}: {message}"),
        };
        Self::new(kind.exit_code(), rendered)
    }

    /// The daemon is unreachable (socket missing, connection refused, or a
    /// framing error talking to it) — not one of the taxonomy's semantic
    /// kinds, so it gets the generic "unexpected error" exit code.
    pub fn unreachable_daemon(cause: impl fmt::Display) -> Self {
        Self::new(1, format!("could not reach pinokiod: {cause} (is it running? try `pinokio daemon start`)"))
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}
