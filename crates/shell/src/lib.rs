// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pinokio-shell: streaming command execution, safe file ops, and atomic
//! JSON read/write. Every blocking operation here accepts a
//! deadline/cancellation token: none is unbounded.

pub mod error;
pub mod exec;
pub mod fs;
pub mod json;

pub use error::ShellError;
pub use exec::{ExecOptions, ExecOutcome, LineRecord, Stream};
pub use fs::IGNORE_NAMES;
pub use json::JsonSchema;
