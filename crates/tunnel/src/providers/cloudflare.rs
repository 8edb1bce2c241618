// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cloudflare provider: spawns a `cloudflared tunnel --url` quick tunnel
//! and scans its log for the assigned `trycloudflare.com` URL. Trimmed to
//! the quick-tunnel mode: this exists for a simple open/close capability,
//! not zone/DNS record management, which a *persistent* named tunnel
//! would additionally require.

use crate::provider::{OpenOpts, OpenedTunnel, Provider};
use async_trait::async_trait;
use pinokio_core::{Error, TunnelProvider};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://[a-zA-Z0-9.\-]+\.trycloudflare\.com").expect("constant regex pattern is valid")
});

pub struct CloudflareProvider;

#[async_trait]
impl Provider for CloudflareProvider {
    fn kind(&self) -> TunnelProvider {
        TunnelProvider::Cloudflare
    }

    async fn open(&self, local_port: u16, _opts: &OpenOpts) -> Result<OpenedTunnel, Error> {
        let args = vec!["tunnel".to_string(), "--url".to_string(), format!("http://localhost:{local_port}")];

        let (url, handle) =
            crate::providers::common::spawn_and_scan("cloudflared", &args, &URL_PATTERN, Duration::from_secs(20)).await?;
        Ok(OpenedTunnel { url, auth_required: false, handle })
    }
}
