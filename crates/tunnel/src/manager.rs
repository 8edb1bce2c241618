// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Tunnel Manager: opens/closes tunnels through the
//! provider registry, keeps the persistent URL book current, and runs an
//! adaptive health-probe loop per open tunnel. Grounded on
//! `health/src/monitor.rs`'s per-subject scheduled-tick shape, generalized
//! from fixed-interval health checks to a probe cadence that tightens on
//! failure and relaxes once a tunnel has been stable for a while.

use crate::book::Book;
use crate::provider::{OpenOpts, Provider, ProcessHandle};
use crate::providers::{CloudflareProvider, CustomProvider, LocaltunnelProvider, NgrokProvider, ServeoProvider};
use chrono::Utc;
use parking_lot::Mutex;
use pinokio_core::{AppId, Error, Event, TunnelId, TunnelMetrics, TunnelProvider, TunnelRecord, TunnelStatus};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const PROBE_INTERVAL_STABLE: Duration = Duration::from_secs(60);
const PROBE_INTERVAL_FAILING: Duration = Duration::from_secs(5);
const STABLE_AFTER_SUCCESSES: u32 = 5;
const RTT_EMA_ALPHA: f64 = 0.3;

struct LiveTunnel {
    handle: ProcessHandle,
    probe_task: JoinHandle<()>,
}

impl Drop for LiveTunnel {
    fn drop(&mut self) {
        self.probe_task.abort();
    }
}

/// Owns every open tunnel's child process and probe task.
pub struct TunnelManager {
    book: Arc<tokio::sync::Mutex<Book>>,
    live: Mutex<HashMap<TunnelId, LiveTunnel>>,
    providers: HashMap<TunnelProvider, Arc<dyn Provider>>,
    events_tx: broadcast::Sender<Event>,
}

impl TunnelManager {
    pub fn new(root: PathBuf) -> Arc<Self> {
        let mut providers: HashMap<TunnelProvider, Arc<dyn Provider>> = HashMap::new();
        providers.insert(TunnelProvider::Ngrok, Arc::new(NgrokProvider));
        providers.insert(TunnelProvider::Cloudflare, Arc::new(CloudflareProvider));
        providers.insert(TunnelProvider::Localtunnel, Arc::new(LocaltunnelProvider));
        providers.insert(TunnelProvider::Serveo, Arc::new(ServeoProvider));
        providers.insert(TunnelProvider::Custom, Arc::new(CustomProvider));

        let (events_tx, _) = broadcast::channel(1024);
        Arc::new(Self {
            book: Arc::new(tokio::sync::Mutex::new(Book::new(&root))),
            live: Mutex::new(HashMap::new()),
            providers,
            events_tx,
        })
    }

    pub async fn load(&self) -> Result<(), Error> {
        self.book.lock().await.load().await
    }

    pub fn watch(&self) -> broadcast::Receiver<Event> {
        self.events_tx.subscribe()
    }

    /// Opens a tunnel with `provider` for `local_port`, persists the record,
    /// and starts its adaptive health-probe loop. Returns the pending
    /// record immediately; callers poll `status` for the provider's URL
    /// once discovered.
    pub async fn open(
        self: &Arc<Self>,
        app_id: AppId,
        provider: TunnelProvider,
        local_port: u16,
        opts: OpenOpts,
    ) -> Result<TunnelRecord, Error> {
        let provider_impl = self
            .providers
            .get(&provider)
            .cloned()
            .ok_or_else(|| Error::unsupported(format!("no provider registered for {provider:?}")))?;

        let id = TunnelId::generate();
        let opened = provider_impl.open(local_port, &opts).await?;

        let record = TunnelRecord {
            id: id.clone(),
            provider,
            local_port,
            url: opened.url.clone(),
            created_at: Utc::now(),
            last_health_at: None,
            status: if opened.url.is_some() { TunnelStatus::Active } else { TunnelStatus::Pending },
            auth_required: opened.auth_required,
            metrics: TunnelMetrics::default(),
        };
        self.book.lock().await.upsert(record.clone()).await?;

        let probe_task = self.clone().spawn_probe(id.clone(), app_id.clone());
        self.live.lock().insert(id.clone(), LiveTunnel { handle: opened.handle, probe_task });

        self.events_tx
            .send(Event::TunnelOpened { tunnel_id: id, app_id, url: record.url.clone(), at: Utc::now() })
            .ok();
        Ok(record)
    }

    /// Closes `id`'s child process and marks the book record closed.
    /// Idempotent: closing an id with no live process still updates the
    /// book and returns `Ok(())`.
    pub async fn close(&self, id: &TunnelId) -> Result<(), Error> {
        if let Some(mut live) = self.live.lock().remove(id) {
            live.handle.close().await;
        }
        self.book.lock().await.mark_closed(id).await?;
        self.events_tx.send(Event::TunnelClosed { tunnel_id: id.clone(), at: Utc::now() }).ok();
        Ok(())
    }

    /// Lists every tunnel that is not closed.
    pub async fn list(&self) -> Vec<TunnelRecord> {
        self.book.lock().await.all().into_iter().filter(|r| r.status != TunnelStatus::Closed).collect()
    }

    pub async fn status(&self, id: &TunnelId) -> Option<TunnelRecord> {
        self.book.lock().await.get(id)
    }

    /// Drops closed records from the book, called periodically by the
    /// owning daemon's cleanup cadence.
    pub async fn prune_closed(&self) -> Result<usize, Error> {
        self.book.lock().await.prune_closed().await
    }

    /// Starts the per-tunnel adaptive probe loop: an HTTP GET against the
    /// tunnel's own URL, tightening to [`PROBE_INTERVAL_FAILING`] after any
    /// failure and relaxing back to [`PROBE_INTERVAL_STABLE`] once
    /// [`STABLE_AFTER_SUCCESSES`] consecutive probes succeed.
    fn spawn_probe(self: Arc<Self>, id: TunnelId, app_id: AppId) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = PROBE_INTERVAL_STABLE;
            let mut consecutive_ok: u32 = 0;
            let client = reqwest::Client::builder().timeout(Duration::from_secs(10)).build().unwrap_or_default();

            loop {
                tokio::time::sleep(interval).await;

                let Some(mut record) = self.book.lock().await.get(&id) else { break };
                if record.status == TunnelStatus::Closed {
                    break;
                }

                let Some(url) = record.url.clone() else {
                    // URL not yet discovered (custom provider, or startup
                    // scan still pending); keep the fast cadence.
                    interval = PROBE_INTERVAL_FAILING;
                    continue;
                };

                let start = std::time::Instant::now();
                let ok = client.get(&url).send().await.map(|r| r.status().is_success() || r.status().as_u16() < 500).unwrap_or(false);
                let rtt_ms = start.elapsed().as_secs_f64() * 1000.0;

                record.last_health_at = Some(Utc::now());
                record.metrics.record_rtt(rtt_ms, RTT_EMA_ALPHA);
                let before = record.status;
                if ok {
                    consecutive_ok += 1;
                    record.status = TunnelStatus::Active;
                    interval = if consecutive_ok >= STABLE_AFTER_SUCCESSES { PROBE_INTERVAL_STABLE } else { PROBE_INTERVAL_FAILING };
                } else {
                    consecutive_ok = 0;
                    record.status = TunnelStatus::Degraded;
                    interval = PROBE_INTERVAL_FAILING;
                }

                let status = record.status;
                let save = self.book.lock().await.upsert(record).await;
                if let Err(e) = save {
                    tracing::warn!(tunnel_id = %id, error = %e, "failed to persist tunnel probe result");
                }
                if before != status {
                    tracing::info!(tunnel_id = %id, app_id = %app_id, ?before, ?status, "tunnel health changed");
                }
            }
        })
    }
}
