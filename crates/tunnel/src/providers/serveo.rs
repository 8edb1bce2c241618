// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! serveo provider: an SSH reverse tunnel (`ssh -R 80:localhost:<port>
//! serveo.net`) scanning the server's banner for the assigned URL.

use crate::provider::{OpenOpts, OpenedTunnel, Provider};
use async_trait::async_trait;
use pinokio_core::{Error, TunnelProvider};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[a-zA-Z0-9.\-]+\.serveo\.net").expect("constant regex pattern is valid"));

pub struct ServeoProvider;

#[async_trait]
impl Provider for ServeoProvider {
    fn kind(&self) -> TunnelProvider {
        TunnelProvider::Serveo
    }

    async fn open(&self, local_port: u16, _opts: &OpenOpts) -> Result<OpenedTunnel, Error> {
        let args = vec![
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-R".to_string(),
            format!("80:localhost:{local_port}"),
            "serveo.net".to_string(),
        ];
        let (url, handle) =
            crate::providers::common::spawn_and_scan("ssh", &args, &URL_PATTERN, Duration::from_secs(20)).await?;
        Ok(OpenedTunnel { url, auth_required: false, handle })
    }
}
