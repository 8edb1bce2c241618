// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! localtunnel provider: spawns `lt --port <port>` and scans for the
//! assigned `loca.lt` URL.

use crate::provider::{OpenOpts, OpenedTunnel, Provider};
use async_trait::async_trait;
use pinokio_core::{Error, TunnelProvider};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://[a-zA-Z0-9.\-]+\.loca\.lt").expect("constant regex pattern is valid"));

pub struct LocaltunnelProvider;

#[async_trait]
impl Provider for LocaltunnelProvider {
    fn kind(&self) -> TunnelProvider {
        TunnelProvider::Localtunnel
    }

    async fn open(&self, local_port: u16, opts: &OpenOpts) -> Result<OpenedTunnel, Error> {
        let mut args = vec!["--port".to_string(), local_port.to_string()];
        if let Some(subdomain) = &opts.subdomain {
            args.push("--subdomain".to_string());
            args.push(subdomain.clone());
        }

        let (url, handle) =
            crate::providers::common::spawn_and_scan("lt", &args, &URL_PATTERN, Duration::from_secs(15)).await?;
        Ok(OpenedTunnel { url, auth_required: false, handle })
    }
}
