// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ngrok provider: spawns `ngrok http <port>` and scans its log output for
//! the forwarding URL. The auth token is read from `opts.auth_token` (set
//! by the caller from `NGROK_TOKEN`) and passed as a CLI flag rather than
//! ever being logged.

use crate::provider::{OpenOpts, OpenedTunnel, Provider};
use async_trait::async_trait;
use pinokio_core::{Error, TunnelProvider};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://[a-zA-Z0-9.\-]+\.ngrok(?:-free)?\.app|https://[a-zA-Z0-9.\-]+\.ngrok\.io")
        .expect("constant regex pattern is valid")
});

pub struct NgrokProvider;

#[async_trait]
impl Provider for NgrokProvider {
    fn kind(&self) -> TunnelProvider {
        TunnelProvider::Ngrok
    }

    async fn open(&self, local_port: u16, opts: &OpenOpts) -> Result<OpenedTunnel, Error> {
        let mut args = vec!["http".to_string(), local_port.to_string(), "--log=stdout".to_string()];
        if let Some(token) = &opts.auth_token {
            args.push(format!("--authtoken={token}"));
        }
        if let Some(subdomain) = &opts.subdomain {
            args.push(format!("--subdomain={subdomain}"));
        }

        let (url, handle) =
            crate::providers::common::spawn_and_scan("ngrok", &args, &URL_PATTERN, Duration::from_secs(15)).await?;
        Ok(OpenedTunnel { url, auth_required: false, handle })
    }
}
