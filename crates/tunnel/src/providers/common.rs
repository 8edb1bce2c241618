// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared spawn-and-scan-for-url helper used by the process-backed
//! providers (ngrok, cloudflare quick tunnel, localtunnel, serveo, custom).
//! Each provider owns the process it spawns here exclusively.

use crate::provider::ProcessHandle;
use pinokio_core::Error;
use pinokio_shell::exec::{self, ExecOptions, Stream};
use regex::Regex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Spawns `program args`, scanning stdout+stderr lines for the first match
/// of `url_pattern` within `startup_timeout`. Returns the matched URL (or
/// `None` if the provider never echoes one back, e.g. a custom command)
/// alongside a [`ProcessHandle`] the caller must eventually `close`.
pub async fn spawn_and_scan(
    program: &str,
    args: &[String],
    url_pattern: &Regex,
    startup_timeout: Duration,
) -> Result<(Option<String>, ProcessHandle), Error> {
    let cancel = CancellationToken::new();
    let opts = ExecOptions { kill_tree_on_cancel: true, ..Default::default() };

    let (mut rx, _pid, join) = exec::run_streaming(program, args, opts, cancel.clone())
        .await
        .map_err(|e| Error::from(e).with_code("tunnel_spawn_failed"))?;

    let scan = async {
        while let Some(record) = rx.recv().await {
            if matches!(record.stream, Stream::Stdout | Stream::Stderr) {
                if let Some(m) = url_pattern.find(&record.line) {
                    return Some(m.as_str().to_string());
                }
            }
        }
        None
    };

    let url = tokio::time::timeout(startup_timeout, scan).await.unwrap_or(None);

    // The scan loop above drains `rx` only until a match or the channel
    // closes; once ownership passes to the caller, drop the receiver so
    // the streaming task isn't blocked writing to a channel nobody reads.
    drop(rx);

    Ok((url, ProcessHandle::new(cancel, join)))
}
