// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup/shutdown sequencing (spec §9). Grounded on the
//! teacher's `lifecycle::{startup, shutdown}` split: resolve
//! configuration, build the control plane, bind the socket, write the PID
//! file, then run until a shutdown signal (SIGINT/SIGTERM or an in-band
//! `Request::Shutdown`) arrives, and clean up the socket/PID file on the
//! way out so a restarted daemon never finds stale entries.

use crate::config::Config;
use crate::control_plane::ControlPlane;
use crate::listener::Listener;
use pinokio_core::Error;
use std::sync::Arc;
use tokio::net::UnixListener;
use tracing::info;

pub struct Daemon {
    pub control_plane: Arc<ControlPlane>,
    config: Config,
}

impl Daemon {
    /// Builds the control plane, binds the Unix socket, and writes the PID
    /// file. The socket path is removed first if stale (a prior daemon
    /// that did not shut down cleanly leaves its socket file behind;
    /// `UnixListener::bind` fails on an existing path unconditionally).
    pub async fn startup(config: Config) -> Result<Self, Error> {
        std::fs::create_dir_all(&config.control_dir).map_err(io_err)?;

        let control_plane = Arc::new(ControlPlane::startup(&config).await?);

        if config.socket_path.exists() {
            std::fs::remove_file(&config.socket_path).map_err(io_err)?;
        }
        info!(socket = %config.socket_path.display(), "listening");

        std::fs::write(&config.pid_path, std::process::id().to_string()).map_err(io_err)?;

        Ok(Self { control_plane, config })
    }

    /// Binds the listener and runs until `control_plane.shutdown` is
    /// cancelled, by either an in-band `Request::Shutdown` or the ctrl-c
    /// handler spawned alongside it.
    pub async fn run(self) -> Result<(), Error> {
        let socket = UnixListener::bind(&self.config.socket_path).map_err(io_err)?;
        let listener = Listener::new(socket, self.control_plane.clone());

        let shutdown = self.control_plane.shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("ctrl-c received, shutting down");
                shutdown.cancel();
            }
        });

        listener.run().await;
        self.teardown()
    }

    fn teardown(self) -> Result<(), Error> {
        if self.config.socket_path.exists() {
            std::fs::remove_file(&self.config.socket_path).ok();
        }
        std::fs::remove_file(&self.config.pid_path).ok();
        info!("daemon stopped");
        Ok(())
    }
}

fn io_err(e: std::io::Error) -> Error {
    Error::internal(e.to_string())
}
