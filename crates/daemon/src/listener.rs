// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unix-socket listener: accepts connections and spawns one task per
//! connection. Grounded on the teacher's `listener/mod.rs` shape (accept
//! loop spawning `handle_connection`, `ConnectionError` wrapping
//! `ProtocolError`), dropped down to Unix-only (no TCP dual-listen, no
//! auth handshake, no attach-upgrade) since spec §6 only calls for a local
//! socket.
//!
//! `AppsEvents`/`ProcessesWatch` are streaming requests: `dispatch()`
//! rejects them outright, so this module intercepts them before the
//! request ever reaches `dispatch::dispatch` and instead pushes
//! `Response::Event` frames from the control plane's event bus until the
//! connection closes.

use crate::control_plane::ControlPlane;
use crate::dispatch;
use pinokio_api::{read_request, write_response, ProtocolError, Request, Response};
use pinokio_core::{AppId, Event};
use std::sync::Arc;
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, info};

pub struct Listener {
    socket: UnixListener,
    ctx: Arc<ControlPlane>,
}

#[derive(Debug, thiserror::Error)]
enum ConnectionError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Listener {
    pub fn new(socket: UnixListener, ctx: Arc<ControlPlane>) -> Self {
        Self { socket, ctx }
    }

    /// Runs the accept loop until `ctx.shutdown` is cancelled.
    pub async fn run(self) {
        loop {
            tokio::select! {
                _ = self.ctx.shutdown.cancelled() => {
                    info!("listener shutting down");
                    return;
                }
                accepted = self.socket.accept() => {
                    match accepted {
                        Ok((stream, _addr)) => {
                            let ctx = Arc::clone(&self.ctx);
                            tokio::spawn(async move {
                                if let Err(err) = handle_connection(stream, &ctx).await {
                                    log_connection_error(err);
                                }
                            });
                        }
                        Err(err) => error!(error = %err, "accept failed"),
                    }
                }
            }
        }
    }
}

fn log_connection_error(err: ConnectionError) {
    match err {
        ConnectionError::Protocol(ProtocolError::Closed) => debug!("client disconnected"),
        other => error!(error = %other, "connection error"),
    }
}

async fn handle_connection(mut stream: UnixStream, ctx: &ControlPlane) -> Result<(), ConnectionError> {
    let request = match read_request(&mut stream).await {
        Ok(request) => request,
        Err(ProtocolError::Closed) => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    info!(request = ?request, "received request");

    match request {
        Request::AppsEvents { app_id } => {
            stream_events(stream, ctx, EventFilter::App(app_id)).await?;
            return Ok(());
        }
        Request::ProcessesWatch => {
            stream_events(stream, ctx, EventFilter::ProcessOnly).await?;
            return Ok(());
        }
        _ => {}
    }

    let response = dispatch::dispatch(request, ctx).await;
    write_response(&mut stream, &response).await?;
    Ok(())
}

enum EventFilter {
    /// `None` subscribes to every app; `Some` narrows to one.
    App(Option<AppId>),
    ProcessOnly,
}

impl EventFilter {
    fn admits(&self, event: &Event) -> bool {
        match self {
            EventFilter::App(None) => true,
            EventFilter::App(Some(app_id)) => event.app_id() == Some(app_id),
            EventFilter::ProcessOnly => matches!(
                event,
                Event::ProcessStarted { .. }
                    | Event::ProcessExited { .. }
                    | Event::RestartCapReached { .. }
                    | Event::RestartTriggered { .. }
            ),
        }
    }
}

/// Pushes `Response::Event` frames until the subscriber lags/closes or the
/// peer disconnects (detected by a failed write). There is no explicit
/// unsubscribe message; connection close is the only end-of-stream signal.
async fn stream_events(mut stream: UnixStream, ctx: &ControlPlane, filter: EventFilter) -> Result<(), ConnectionError> {
    let mut events = ctx.supervisor.watch();
    loop {
        tokio::select! {
            _ = ctx.shutdown.cancelled() => return Ok(()),
            received = events.recv() => {
                match received {
                    Ok(event) => {
                        if !filter.admits(&event) {
                            continue;
                        }
                        if write_response(&mut stream, &Response::Event { event }).await.is_err() {
                            return Ok(());
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "event subscriber lagged, dropping skipped frames");
                        continue;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => return Ok(()),
                }
            }
        }
    }
}
