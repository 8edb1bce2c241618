// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin client over the control-plane's Unix-socket wire protocol
//! (spec §4.M, §6). One request, one response, per call — the `apps.events`
//! / `processes.watch` streams are read separately by the `watch` helpers
//! below since they never terminate with a single `Response`.

use crate::exit_error::ExitError;
use pinokio_api::{read_response, write_request, ProtocolError, Request, Response};
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::UnixStream;

/// Default request round-trip deadline. Long-running control-plane
/// operations (install, start) complete on the daemon's side asynchronously
/// and the request itself returns promptly; this bounds only the
/// request/response exchange, per spec §5's "every call accepts a
/// deadline/timeout".
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Client {
    socket_path: PathBuf,
}

impl Client {
    pub fn new(socket_path: PathBuf) -> Self {
        Self { socket_path }
    }

    /// Sends one request and waits for one response.
    pub async fn call(&self, request: Request) -> Result<Response, ExitError> {
        let mut stream = self.connect().await?;
        tokio::time::timeout(REQUEST_TIMEOUT, send_receive(&mut stream, &request))
            .await
            .map_err(|_| ExitError::new(6, "timed out waiting for pinokiod to respond"))?
    }

    /// Opens a streaming connection for `apps.events`/`processes.watch`:
    /// sends the subscribing request, then hands the raw stream back so the
    /// caller can read `Response::Event` frames until the connection closes.
    pub async fn watch(&self, request: Request) -> Result<UnixStream, ExitError> {
        let mut stream = self.connect().await?;
        write_request(&mut stream, &request).await.map_err(ExitError::unreachable_daemon)?;
        Ok(stream)
    }

    async fn connect(&self) -> Result<UnixStream, ExitError> {
        UnixStream::connect(&self.socket_path).await.map_err(|e| {
            ExitError::unreachable_daemon(format!("{} ({})", e, self.socket_path.display()))
        })
    }
}

async fn send_receive(stream: &mut UnixStream, request: &Request) -> Result<Response, ExitError> {
    write_request(stream, request).await.map_err(protocol_error)?;
    read_response(stream).await.map_err(protocol_error)
}

fn protocol_error(err: ProtocolError) -> ExitError {
    match err {
        ProtocolError::Closed => ExitError::unreachable_daemon("connection closed before a response arrived"),
        other => ExitError::unreachable_daemon(other),
    }
}

/// Converts a `Response` into a `Result`, turning `Response::Error` into the
/// matching `ExitError`. Every command handler funnels its response through
/// this before rendering output.
pub fn ok_or_exit(response: Response) -> Result<Response, ExitError> {
    match response {
        Response::Error { kind, message, code } => Err(ExitError::from_response(kind, message, code)),
        other => Ok(other),
    }
}
