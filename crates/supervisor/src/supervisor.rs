// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process/daemon supervisor. Owns every tracked process
//! exclusively: a single writer task consumes a command channel in arrival
//! order, while `List`/`Get`/`Watch` read a copy-on-write snapshot without
//! round-tripping through the writer.
//!
//! Grounded on `oj-daemon`'s reconciliation loop shape (one task owns
//! mutable state, commands serialize through it) and `oj-engine/runtime`'s
//! monitor/reaper split, generalized from job/agent lifecycle to OS
//! process lifecycle with a real port pool and process-group signals.

use crate::command::{Command, StartOpts, StopOpts};
use crate::daemon_spec::DaemonSpec;
use crate::port_pool::PortPool;
use chrono::Utc;
use pinokio_core::{AppId, Error, ErrorKind, Event, ProcessId, ProcessRecord, ProcessStatus};
use pinokio_shell::exec::{ExecOptions, LineRecord};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch, Notify};
use tokio_util::sync::CancellationToken;

/// A log line tagged with the process/app it came from, broadcast for
/// Error Recovery's pattern matching. Lines are fire-and-forget: a lagging
/// subscriber drops old lines rather than slowing the child's own stdout
/// pipe.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub app_id: AppId,
    pub process_id: ProcessId,
    pub line: LineRecord,
}

struct Tracked {
    record: ProcessRecord,
    pid: Option<u32>,
    daemon: Option<DaemonSpec>,
    cancel: CancellationToken,
    notify_exit: Arc<Notify>,
    /// Set while a `Stop`/`Restart` is in flight so the exit handler
    /// doesn't honor an `always`/`on_failure` restart policy for an exit we
    /// ourselves requested.
    stopping: bool,
    original_cmd: Vec<String>,
}

type Snapshot = Arc<HashMap<ProcessId, ProcessRecord>>;

/// Handle to the running Supervisor actor. Cloning is cheap; every clone
/// shares the same writer task and port pool.
#[derive(Clone)]
pub struct Supervisor {
    cmd_tx: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<Snapshot>,
    events_tx: broadcast::Sender<Event>,
    logs_tx: broadcast::Sender<LogLine>,
}

impl Supervisor {
    pub fn new(port_low: u16, port_high: u16) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(256);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(HashMap::new()));
        let (events_tx, _) = broadcast::channel(1024);
        let (logs_tx, _) = broadcast::channel(1024);

        let actor = Actor {
            records: HashMap::new(),
            ports: PortPool::new(port_low, port_high),
            cmd_tx: cmd_tx.clone(),
            snapshot_tx,
            events_tx: events_tx.clone(),
            logs_tx: logs_tx.clone(),
        };
        tokio::spawn(actor.run(cmd_rx));

        Self { cmd_tx, snapshot_rx, events_tx, logs_tx }
    }

    pub async fn start(&self, app_id: AppId, cmd: Vec<String>, opts: StartOpts) -> Result<ProcessId, Error> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Start { app_id, cmd, opts, reply })
            .await
            .map_err(|_| Error::internal("supervisor actor stopped"))?;
        rx.await.map_err(|_| Error::internal("supervisor actor dropped reply"))?
    }

    pub async fn stop(&self, id: ProcessId, opts: StopOpts) -> Result<(), Error> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Stop { id, opts, reply })
            .await
            .map_err(|_| Error::internal("supervisor actor stopped"))?;
        rx.await.map_err(|_| Error::internal("supervisor actor dropped reply"))?
    }

    pub async fn restart(&self, id: ProcessId) -> Result<ProcessId, Error> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Restart { id, reply })
            .await
            .map_err(|_| Error::internal("supervisor actor stopped"))?;
        rx.await.map_err(|_| Error::internal("supervisor actor dropped reply"))?
    }

    /// Read-only snapshot; never round-trips through the writer task.
    pub fn list(&self) -> Vec<ProcessRecord> {
        self.snapshot_rx.borrow().values().cloned().collect()
    }

    pub fn get(&self, id: &ProcessId) -> Option<ProcessRecord> {
        self.snapshot_rx.borrow().get(id).cloned()
    }

    /// Stops every `Running` process started more than `idle_for` ago,
    /// used by the performance monitor's advisory trim hook. Best-effort:
    /// a process that fails to stop is skipped rather than aborting the
    /// whole sweep.
    pub async fn trim_idle(&self, idle_for: Duration) -> usize {
        let cutoff = Utc::now() - chrono::Duration::from_std(idle_for).unwrap_or(chrono::Duration::zero());
        let candidates: Vec<ProcessId> = self
            .list()
            .into_iter()
            .filter(|r| r.status == ProcessStatus::Running && r.started_at < cutoff)
            .map(|r| r.id)
            .collect();

        let mut trimmed = 0;
        for id in candidates {
            if self.stop(id, StopOpts::default()).await.is_ok() {
                trimmed += 1;
            }
        }
        trimmed
    }

    pub fn watch(&self) -> broadcast::Receiver<Event> {
        self.events_tx.subscribe()
    }

    /// Subscribes to every tracked process's stdout/stderr lines, tagged
    /// with the originating app/process. Error Recovery taps this to match
    /// log patterns.
    pub fn watch_logs(&self) -> broadcast::Receiver<LogLine> {
        self.logs_tx.subscribe()
    }
}

struct Actor {
    records: HashMap<ProcessId, Tracked>,
    ports: PortPool,
    cmd_tx: mpsc::Sender<Command>,
    snapshot_tx: watch::Sender<Snapshot>,
    events_tx: broadcast::Sender<Event>,
    logs_tx: broadcast::Sender<LogLine>,
}

impl Actor {
    async fn run(mut self, mut cmd_rx: mpsc::Receiver<Command>) {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                Command::Start { app_id, cmd, opts, reply } => {
                    let result = self.do_start(app_id, cmd, opts).await;
                    self.publish_snapshot();
                    let _ = reply.send(result);
                }
                Command::Stop { id, opts, reply } => {
                    self.do_stop(id, opts, reply);
                }
                Command::Restart { id, reply } => {
                    self.do_restart(id, reply);
                }
                Command::Exited { id, code } => {
                    self.handle_exit(id, code);
                    self.publish_snapshot();
                }
                Command::MarkLost { id } => {
                    if let Some(tracked) = self.records.get_mut(&id) {
                        tracked.record.status = ProcessStatus::Lost;
                        for port in tracked.record.ports_owned.drain(..) {
                            self.ports.release(port);
                        }
                    }
                    self.publish_snapshot();
                }
                Command::BumpRestartCount { id, restart_count } => {
                    if let Some(tracked) = self.records.get_mut(&id) {
                        tracked.record.restart_count = restart_count;
                    }
                    self.publish_snapshot();
                }
            }
        }
    }

    async fn do_start(&mut self, app_id: AppId, cmd: Vec<String>, opts: StartOpts) -> Result<ProcessId, Error> {
        if cmd.is_empty() {
            return Err(Error::invalid_input("command must have at least one argument"));
        }

        let mut ports_owned = Vec::new();
        if opts.needs_port {
            let port = match opts.port {
                Some(p) if self.ports.reserve(p) => p,
                Some(p) => return Err(Error::conflict(format!("port {p} already owned by a tracked process"))),
                None => self.ports.allocate().ok_or_else(|| Error::new(ErrorKind::ResourceExhausted, "no free ports in supervisor pool"))?,
            };
            ports_owned.push(port);
        }

        let id = ProcessId::generate();
        let cancel = CancellationToken::new();
        let exec_opts = ExecOptions {
            cwd: Some(opts.workdir.clone()),
            env: opts.env.clone(),
            create_cwd: true,
            kill_tree_on_cancel: true,
            ..Default::default()
        };

        let spawn = pinokio_shell::exec::run_streaming(&cmd[0], &cmd[1..], exec_opts, cancel.clone()).await;
        let (mut lines, pid, handle) = match spawn {
            Ok(v) => v,
            Err(e) => {
                for port in ports_owned {
                    self.ports.release(port);
                }
                return Err(Error::from(e));
            }
        };

        // Forward every line to the log-tap broadcast so Error Recovery can
        // pattern-match it; draining here (rather than at the subscriber)
        // keeps the child's stdout pipe from ever backing up even with no
        // subscriber attached.
        let logs_tx = self.logs_tx.clone();
        let log_app_id = app_id.clone();
        let log_process_id = id.clone();
        tokio::spawn(async move {
            while let Some(line) = lines.recv().await {
                let _ = logs_tx.send(LogLine { app_id: log_app_id.clone(), process_id: log_process_id.clone(), line });
            }
        });

        let notify_exit = Arc::new(Notify::new());
        let notify_for_reaper = notify_exit.clone();
        let cmd_tx = self.cmd_tx.clone();
        let reaper_id = id.clone();
        tokio::spawn(async move {
            let outcome = handle.await;
            let code = match outcome {
                Ok(Ok(code)) => code,
                Ok(Err(_)) => None,
                Err(_) => None,
            };
            notify_for_reaper.notify_waiters();
            let _ = cmd_tx.send(Command::Exited { id: reaper_id, code }).await;
        });

        let record = ProcessRecord {
            id: id.clone(),
            app_id,
            group_id: pid.unwrap_or(0),
            command: cmd.clone(),
            workdir: opts.workdir,
            env: opts.env,
            started_at: Utc::now(),
            status: ProcessStatus::Running,
            ports_owned,
            last_exit_code: None,
            restart_count: 0,
            restart_budget: opts.daemon.as_ref().map(|d| d.max_restarts).unwrap_or(0),
        };

        self.events_tx.send(Event::ProcessStarted { process_id: id.clone(), app_id: record.app_id.clone(), at: record.started_at }).ok();

        self.records.insert(
            id.clone(),
            Tracked { record, pid, daemon: opts.daemon, cancel, notify_exit, stopping: false, original_cmd: cmd },
        );

        Ok(id)
    }

    fn do_stop(&mut self, id: ProcessId, opts: StopOpts, reply: oneshot::Sender<Result<(), Error>>) {
        let Some(tracked) = self.records.get_mut(&id) else {
            let _ = reply.send(Err(Error::not_found(format!("no tracked process {id}"))));
            return;
        };

        if tracked.record.is_terminal() {
            let _ = reply.send(Ok(()));
            return;
        }

        tracked.stopping = true;
        tracked.record.status = ProcessStatus::Stopping;
        if let Some(pid) = tracked.pid {
            soft_kill(pid);
        }

        let notify = tracked.notify_exit.clone();
        let cancel = tracked.cancel.clone();
        let cmd_tx = self.cmd_tx.clone();

        tokio::spawn(async move {
            let exited = tokio::select! {
                _ = notify.notified() => true,
                _ = tokio::time::sleep(opts.grace) => false,
            };
            if !exited {
                cancel.cancel();
                let exited = tokio::select! {
                    _ = notify.notified() => true,
                    _ = tokio::time::sleep(opts.force_after) => false,
                };
                if !exited {
                    let _ = cmd_tx.send(Command::MarkLost { id }).await;
                }
            }
            let _ = reply.send(Ok(()));
        });
    }

    fn do_restart(&mut self, id: ProcessId, reply: oneshot::Sender<Result<ProcessId, Error>>) {
        let Some(tracked) = self.records.get(&id) else {
            let _ = reply.send(Err(Error::not_found(format!("no tracked process {id}"))));
            return;
        };

        let app_id = tracked.record.app_id.clone();
        let cmd = tracked.original_cmd.clone();
        let opts = StartOpts {
            workdir: tracked.record.workdir.clone(),
            env: tracked.record.env.clone(),
            needs_port: !tracked.record.ports_owned.is_empty(),
            port: tracked.record.ports_owned.first().copied(),
            daemon: tracked.daemon.clone(),
        };
        let restart_count = tracked.record.restart_count + 1;

        let stop_opts = StopOpts::default();
        let (stop_reply, stop_rx) = oneshot::channel();
        self.do_stop(id.clone(), stop_opts, stop_reply);

        let cmd_tx = self.cmd_tx.clone();
        tokio::spawn(async move {
            let _ = stop_rx.await;
            let (start_reply, start_rx) = oneshot::channel();
            if cmd_tx.send(Command::Start { app_id, cmd, opts, reply: start_reply }).await.is_err() {
                let _ = reply.send(Err(Error::internal("supervisor actor stopped")));
                return;
            }
            let result = start_rx.await.map_err(|_| Error::internal("supervisor actor dropped reply")).and_then(|r| r);
            if let Ok(new_id) = &result {
                let _ = cmd_tx.send(Command::BumpRestartCount { id: new_id.clone(), restart_count }).await;
            }
            let _ = reply.send(result);
        });
    }

    fn handle_exit(&mut self, id: ProcessId, code: Option<i32>) {
        let Some(tracked) = self.records.get_mut(&id) else { return };
        tracked.record.status = ProcessStatus::Exited;
        tracked.record.last_exit_code = code;
        for port in tracked.record.ports_owned.drain(..) {
            self.ports.release(port);
        }
        let app_id = tracked.record.app_id.clone();
        self.events_tx.send(Event::ProcessExited { process_id: id.clone(), app_id: app_id.clone(), exit_code: code, at: Utc::now() }).ok();

        if tracked.stopping {
            return;
        }
        let Some(daemon) = tracked.daemon.clone() else { return };
        if !daemon.restart_policy.should_restart(code) {
            return;
        }
        if tracked.record.restart_count >= tracked.record.restart_budget {
            self.events_tx.send(Event::RestartCapReached { app_id, process_id: id.clone(), at: Utc::now() }).ok();
            return;
        }

        let delay = daemon.backoff.delay(tracked.record.restart_count);
        let cmd_tx = self.cmd_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let (reply, _rx) = oneshot::channel();
            let _ = cmd_tx.send(Command::Restart { id, reply }).await;
        });
    }

    fn publish_snapshot(&self) {
        let snapshot: HashMap<ProcessId, ProcessRecord> =
            self.records.iter().map(|(id, t)| (id.clone(), t.record.clone())).collect();
        self.snapshot_tx.send(Arc::new(snapshot)).ok();
    }
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn soft_kill(pid: u32) {
    // SAFETY: kill only reads its arguments; a positive pid signals the
    // process itself (not its group), matching "sends soft signal" before
    // any process-group escalation.
    unsafe {
        libc::kill(pid as i32, libc::SIGTERM);
    }
}

#[cfg(not(unix))]
fn soft_kill(_pid: u32) {}
