// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The control plane: every component (spec §4.A-§4.L) wired together
//! behind one façade (§4.M), constructed once at startup with every
//! dependency injected — the only singleton-shaped piece of this system.
//! Grounded on the teacher's `lifecycle::DaemonState`, generalized from one
//! job/agent runtime to the twelve app-lifecycle components this system
//! has instead.

use crate::config::Config;
use crate::hooks::DaemonHooks;
use pinokio_cache::CacheManager;
use pinokio_catalog::{Analyzer, Catalog};
use pinokio_core::{AppId, AppProfile, AppState, AppStateRecord, CacheKind, Error, ErrorKind, Event, PathKind, Platform, ProcessId, SystemClock};
use pinokio_engine::{InstallEngine, InstallRequest, StateStore};
use pinokio_env::EnvManager;
use pinokio_health::HealthMonitor;
use pinokio_perf::PerfMonitor;
use pinokio_recovery::{ActionContext, ErrorRecovery};
use pinokio_supervisor::{StartOpts, StopOpts, Supervisor};
use pinokio_tunnel::TunnelManager;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

const MEM_CACHE_CAP_BYTES: u64 = 256 * 1024 * 1024;
const DISK_CACHE_CAP_BYTES: u64 = 8 * 1024 * 1024 * 1024;
const EPHEMERAL_PORT_LOW: u16 = 20000;
const EPHEMERAL_PORT_HIGH: u16 = 29999;
const PERF_SAMPLE_CADENCE: Duration = Duration::from_secs(10);

/// Every component this system builds, wired together. Cloning is cheap:
/// every field is itself an `Arc`/actor-handle/channel clone, so the same
/// `ControlPlane` can be shared across every connection-handling task.
#[derive(Clone)]
pub struct ControlPlane {
    pub platform: Arc<Platform>,
    pub path_map: Arc<pinokio_platform::PathMap>,
    pub catalog: Arc<Catalog>,
    pub env: Arc<EnvManager>,
    pub engine: Arc<InstallEngine<SystemClock>>,
    pub supervisor: Supervisor,
    pub health: Arc<HealthMonitor>,
    pub tunnels: Arc<TunnelManager>,
    pub cache: Arc<CacheManager>,
    pub perf: Arc<PerfMonitor>,
    pub recovery: Arc<ErrorRecovery>,
    pub shutdown: CancellationToken,
}

impl ControlPlane {
    /// Builds every component and loads persisted state. Per spec §9's
    /// startup order: detect platform, resolve paths, then load each
    /// component's durable state before the listener starts accepting
    /// connections.
    pub async fn startup(config: &Config) -> Result<Self, Error> {
        let platform = Arc::new(config.resolve_platform());
        info!(kind = ?platform.kind, confidence = platform.confidence, "platform resolved");

        let path_map = Arc::new(pinokio_platform::PathMap::new(&platform));
        for kind in [
            PathKind::Apps,
            PathKind::Data,
            PathKind::Cache,
            PathKind::Logs,
            PathKind::Models,
            PathKind::Config,
            PathKind::Workspace,
            PathKind::Tmp,
            PathKind::Env,
            PathKind::State,
            PathKind::Tunnels,
        ] {
            path_map.ensure(kind, None).await.map_err(Error::from)?;
        }

        let catalog_path = path_map.map(PathKind::Config, None).join("catalog.json");
        let catalog = Arc::new(match Catalog::load(&catalog_path).await {
            Ok(catalog) => catalog,
            Err(e) if e.kind == ErrorKind::NotFound => Catalog::default(),
            Err(e) => return Err(e),
        });

        let env = Arc::new(EnvManager::new(path_map.clone()));

        let state_dir = path_map.map(PathKind::State, None);
        let engine = Arc::new(InstallEngine::new(state_dir.clone(), env.clone(), SystemClock));

        let supervisor = Supervisor::new(EPHEMERAL_PORT_LOW, EPHEMERAL_PORT_HIGH);
        let health = Arc::new(HealthMonitor::new(supervisor.clone()));

        let tunnels_dir = path_map.map(PathKind::Tunnels, None);
        let tunnels = TunnelManager::new(tunnels_dir);
        tunnels.load().await?;

        let cache_dir = path_map.map(PathKind::Cache, None);
        let cache = CacheManager::new(cache_dir, MEM_CACHE_CAP_BYTES, DISK_CACHE_CAP_BYTES);
        cache.load().await?;

        let perf = PerfMonitor::new(Some(cache.clone()), Some(supervisor.clone()), None);

        let hooks = Arc::new(DaemonHooks { env: env.clone(), cache: cache.clone(), path_map: path_map.clone() });
        let shutdown = CancellationToken::new();
        let action_ctx = ActionContext {
            app_id: None,
            process_id: None,
            supervisor: Some(supervisor.clone()),
            cache: Some(cache.clone()),
            tunnels: Some(tunnels.clone()),
            daemon_shutdown: Some(shutdown.clone()),
            hooks: Some(hooks),
        };
        let recovery = ErrorRecovery::new(&state_dir, action_ctx);
        recovery.load().await?;
        recovery.start(supervisor.clone(), health.watch());

        perf.start(platform.base_path.clone(), PERF_SAMPLE_CADENCE);

        let control_plane = Self {
            platform,
            path_map,
            catalog,
            env,
            engine,
            supervisor,
            health,
            tunnels,
            cache,
            perf,
            recovery,
            shutdown,
        };

        control_plane.reconcile().await?;
        control_plane.spawn_process_bridge();
        Ok(control_plane)
    }

    /// Keeps each app's persisted `AppStateRecord` in sync with the
    /// Supervisor's live process table: a process starting completes the
    /// `Starting -> Running` edge `start()` began, and a process exiting
    /// (for any reason — a clean stop, a crash, a lost watchdog) walks the
    /// record back to `Installed`.
    fn spawn_process_bridge(&self) {
        let mut events = self.supervisor.watch();
        let state_dir = self.path_map.map(PathKind::State, None);
        tokio::spawn(async move {
            let store = StateStore::new(state_dir);
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                };
                match event {
                    Event::ProcessStarted { app_id, .. } => {
                        if let Ok(mut record) = store.load(&app_id).await {
                            if record.status == AppState::Starting && record.transition(AppState::Running, &SystemClock).is_ok() {
                                let _ = store.save(&record).await;
                            }
                        }
                    }
                    Event::ProcessExited { app_id, .. } => {
                        if let Ok(mut record) = store.load(&app_id).await {
                            if matches!(record.status, AppState::Running | AppState::Degraded)
                                && record.transition(AppState::Stopping, &SystemClock).is_ok()
                            {
                                let _ = record.transition(AppState::Installed, &SystemClock);
                                let _ = store.save(&record).await;
                            }
                        }
                    }
                    _ => {}
                }
            }
        });
    }

    /// Re-derives installed apps' `Running`/`Degraded` state against the
    /// Supervisor's own snapshot, since the persisted record and the
    /// Supervisor's live process table can diverge across a daemon
    /// restart (the process outlives the daemon; the daemon's
    /// `AppStateRecord` does not). Grounded on the teacher's
    /// `lifecycle::reconcile_state`.
    async fn reconcile(&self) -> Result<(), Error> {
        let apps = self.list_app_ids().await?;
        let store = StateStore::new(self.path_map.map(PathKind::State, None));
        for app_id in apps {
            let mut record = store.load(&app_id).await?;
            if matches!(record.status, AppState::Running | AppState::Starting | AppState::Degraded) {
                // The state machine's normal graph has no direct edge back to
                // Installed from here (it only models a live process being
                // stopped); a restarted daemon starts with an empty
                // Supervisor, so every surviving record is stale by
                // definition and is corrected directly rather than walked
                // through Stopping.
                record.status = AppState::Installed;
                store.save(&record).await?;
                tracing::warn!(%app_id, "no surviving process found at startup; reverted to installed");
            }
        }
        Ok(())
    }

    pub async fn state_store(&self) -> StateStore {
        StateStore::new(self.path_map.map(PathKind::State, None))
    }

    /// Lists every app id with a persisted state record. `state/` also
    /// holds `processes.json` (spec §6's on-disk layout), which is not an
    /// app record and must be filtered out.
    pub async fn list_app_ids(&self) -> Result<Vec<AppId>, Error> {
        let state_dir = self.path_map.map(PathKind::State, None);
        let entries = pinokio_shell::fs::walk(&state_dir).await.map_err(Error::from)?;
        Ok(entries
            .into_iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?;
                let stem = name.strip_suffix(".json")?;
                if stem == "processes" {
                    return None;
                }
                Some(AppId::new(stem))
            })
            .collect())
    }

    pub async fn list_app_states(&self) -> Result<Vec<AppStateRecord>, Error> {
        let store = self.state_store().await;
        let mut records = Vec::new();
        for app_id in self.list_app_ids().await? {
            records.push(store.load(&app_id).await?);
        }
        Ok(records)
    }

    pub fn app_root(&self, app_id: &AppId) -> PathBuf {
        self.path_map.map(PathKind::Apps, Some(app_id))
    }

    /// A non-committing preview: inspects `app_id`'s source tree (already
    /// placed at `apps/<app_id>/` by whatever fetched it — cloning from a
    /// catalog entry's `repo_url` is outside this system's twelve
    /// components) and caches the resulting profile, without moving the
    /// app's persisted state machine (that only happens once `install`
    /// actually runs the install flow).
    pub async fn analyze(&self, app_id: &AppId) -> Result<AppProfile, Error> {
        let root = self.app_root(app_id);
        let category_hint = self.catalog.find(app_id.as_str()).map(|e| e.category_hint).unwrap_or(pinokio_core::AppCategory::Unknown);
        let analyzer = Analyzer::new();
        let profile = analyzer.analyze(app_id, &root, category_hint).await?;

        let key = pinokio_core::CacheKey::new(app_id.as_str());
        let value = pinokio_cache::CacheValue::Json(serde_json::to_value(&profile).map_err(Error::corrupt)?);
        self.cache.put(key, value, CacheKind::AppMetadata, pinokio_cache::PutOpts::default()).await?;
        Ok(profile)
    }

    pub async fn install(&self, app_id: &AppId, inputs: serde_json::Value) -> Result<AppProfile, Error> {
        let category_hint = self.catalog.find(app_id.as_str()).map(|e| e.category_hint).unwrap_or(pinokio_core::AppCategory::Unknown);
        let values = json_object_to_form_values(&inputs);
        let request = InstallRequest {
            app_id: app_id.clone(),
            app_root: self.app_root(app_id),
            category_hint,
            form: Vec::new(),
            values,
            profile: None,
        };
        let profile = self.engine.install(request).await?;
        let key = pinokio_core::CacheKey::new(app_id.as_str());
        let value = pinokio_cache::CacheValue::Json(serde_json::to_value(&profile).map_err(Error::corrupt)?);
        self.cache.put(key, value, CacheKind::AppMetadata, pinokio_cache::PutOpts::default()).await?;
        Ok(profile)
    }

    pub async fn uninstall(&self, app_id: &AppId) -> Result<(), Error> {
        if self.env.exists(app_id) {
            self.env.destroy(app_id).await?;
        }
        let app_dir = self.app_root(app_id);
        if tokio::fs::try_exists(&app_dir).await.unwrap_or(false) {
            pinokio_shell::fs::remove_tree(&app_dir).await.map_err(Error::from)?;
        }

        // Uninstall tears down the record unconditionally regardless of
        // which state it was in, so the status is forced directly rather
        // than walked through the normal transition graph.
        let store = self.state_store().await;
        store.remove(app_id).await
    }

    async fn cached_profile(&self, app_id: &AppId) -> Result<AppProfile, Error> {
        let key = pinokio_core::CacheKey::new(app_id.as_str());
        match self.cache.get(&key, CacheKind::AppMetadata).await? {
            Some(value) => {
                let json = value.as_json().ok_or_else(|| Error::corrupt(format!("cached profile for {app_id} is not JSON")))?;
                serde_json::from_value(json.clone()).map_err(|e| Error::corrupt(format!("cached profile for {app_id} is malformed: {e}")))
            }
            None => Err(Error::not_found(format!("no analyzed profile for {app_id}; run apps.analyze or apps.install first"))),
        }
    }

    /// Launches `app_id`'s conventional entry point (`start.py`, `app.py`,
    /// ... — spec §6's `apps.start`). Requires a cached profile from a
    /// prior `analyze`/`install` so the declared dependencies and port
    /// needs are known without re-walking the source tree.
    pub async fn start(&self, app_id: &AppId) -> Result<ProcessId, Error> {
        let store = self.state_store().await;
        let mut record = store.load(app_id).await?;
        record.transition(AppState::Starting, &SystemClock)?;
        store.save(&record).await?;

        match self.start_inner(app_id).await {
            Ok(process_id) => Ok(process_id),
            Err(err) => {
                let mut record = store.load(app_id).await?;
                record.failure = Some(pinokio_core::Failure {
                    kind: err.kind,
                    step: None,
                    message: err.message.clone(),
                    log_tail: Vec::new(),
                });
                record.transition(AppState::Failed, &SystemClock).ok();
                store.save(&record).await.ok();
                Err(err)
            }
        }
    }

    async fn start_inner(&self, app_id: &AppId) -> Result<ProcessId, Error> {
        let profile = self.cached_profile(app_id).await?;
        let root = self.app_root(app_id);
        let listing = pinokio_shell::fs::walk(&root).await.map_err(Error::from)?;
        let file_names = pinokio_catalog::file_names_at(&root, &listing);
        let entry = pinokio_catalog::classify_entry_point(&file_names)
            .ok_or_else(|| Error::not_found(format!("no recognized launch entry point under {}", root.display())))?;

        let handle = self.env.ensure(app_id, &profile.deps).await?;
        let env_vars = self.env.activate(&handle);

        let opts = StartOpts { workdir: root, env: env_vars, needs_port: profile.needs_tunnel, port: profile.port, daemon: None };
        self.supervisor.start(app_id.clone(), launch_command(&entry), opts).await
    }

    /// Stops the single tracked process for `app_id`, if any (spec §6's
    /// `apps.stop`). There is at most one live process per app under this
    /// system's single-process-per-app convention.
    pub async fn stop_app(&self, app_id: &AppId, grace_s: Option<u64>, force_after_s: Option<u64>) -> Result<(), Error> {
        let process = self
            .supervisor
            .list()
            .into_iter()
            .find(|p| &p.app_id == app_id && !p.is_terminal())
            .ok_or_else(|| Error::not_found(format!("no running process for {app_id}")))?;
        let defaults = StopOpts::default();
        let opts = StopOpts {
            grace: grace_s.map(Duration::from_secs).unwrap_or(defaults.grace),
            force_after: force_after_s.map(Duration::from_secs).unwrap_or(defaults.force_after),
        };
        self.supervisor.stop(process.id, opts).await
    }
}

/// Picks an interpreter for `entry` by extension; anything not recognized
/// as a Python script is run as a shell script, matching Pinokio's own
/// `start.sh` convention for non-Python apps.
fn launch_command(entry: &str) -> Vec<String> {
    if entry.ends_with(".py") {
        vec!["python3".to_string(), entry.to_string()]
    } else {
        vec!["sh".to_string(), entry.to_string()]
    }
}

/// Flattens a JSON object into the engine's `FormValues` (`HashMap<String,
/// String>`), stringifying non-string scalars so form validation can run
/// against the same representation regardless of how the client encoded a
/// value (`true` vs `"true"`).
fn json_object_to_form_values(value: &serde_json::Value) -> std::collections::HashMap<String, String> {
    let mut out = std::collections::HashMap::new();
    if let Some(obj) = value.as_object() {
        for (k, v) in obj {
            let s = match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            out.insert(k.clone(), s);
        }
    }
    out
}
