// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Individual health check runners: process, tcp, http, log,
//! resource, custom. Each returns a [`CheckStatus`] snapshot; the monitor
//! (`monitor.rs`) owns scheduling and aggregation.

use chrono::Utc;
use pinokio_core::{CheckStatus, HealthStatus, ProcessId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum HealthCheckSpec {
    Process { process_id: ProcessId },
    Tcp { host: String, port: u16, timeout_ms: u64 },
    Http { url: String, expected_status: u16, timeout_ms: u64 },
    Log {
        path: std::path::PathBuf,
        pattern: String,
        max_matches: usize,
        window_lines: usize,
    },
    Resource { process_id: ProcessId, cpu_pct_max: f32, mem_pct_max: f32 },
    Custom { process_id: ProcessId, command: String, args: Vec<String>, timeout_ms: u64 },
}

fn ok(message: impl Into<String>, latency: Duration) -> CheckStatus {
    let now = Utc::now();
    CheckStatus {
        status: HealthStatus::Healthy,
        message: message.into(),
        last_ok_at: Some(now),
        last_fail_at: None,
        latency_ms: Some(latency.as_millis() as u64),
        details: serde_json::Value::Null,
    }
}

fn fail(status: HealthStatus, message: impl Into<String>, latency: Option<Duration>) -> CheckStatus {
    let now = Utc::now();
    CheckStatus {
        status,
        message: message.into(),
        last_ok_at: None,
        last_fail_at: Some(now),
        latency_ms: latency.map(|d| d.as_millis() as u64),
        details: serde_json::Value::Null,
    }
}

/// Runs one check. Never panics or propagates an error: a check that
/// cannot complete (timeout, connection refused, missing file) reports an
/// `unhealthy`/`critical` [`CheckStatus`] instead, since the Health Monitor
/// never surfaces a bare `Result::Err` for a single probe failure.
pub async fn run_check(
    spec: &HealthCheckSpec,
    supervisor: &pinokio_supervisor::Supervisor,
) -> CheckStatus {
    let start = std::time::Instant::now();
    match spec {
        HealthCheckSpec::Process { process_id } => match supervisor.get(process_id) {
            Some(record) if record.status == pinokio_core::ProcessStatus::Running => ok("process alive", start.elapsed()),
            Some(record) => fail(HealthStatus::Critical, format!("process status is {:?}", record.status), Some(start.elapsed())),
            None => fail(HealthStatus::Critical, "process not tracked", Some(start.elapsed())),
        },
        HealthCheckSpec::Tcp { host, port, timeout_ms } => {
            let addr = format!("{host}:{port}");
            match tokio::time::timeout(Duration::from_millis(*timeout_ms), tokio::net::TcpStream::connect(&addr)).await {
                Ok(Ok(_)) => ok(format!("connected to {addr}"), start.elapsed()),
                Ok(Err(e)) => fail(HealthStatus::Unhealthy, format!("tcp connect to {addr} failed: {e}"), Some(start.elapsed())),
                Err(_) => fail(HealthStatus::Unhealthy, format!("tcp connect to {addr} timed out"), Some(start.elapsed())),
            }
        }
        HealthCheckSpec::Http { url, expected_status, timeout_ms } => {
            let client = match reqwest::Client::builder().timeout(Duration::from_millis(*timeout_ms)).build() {
                Ok(c) => c,
                Err(e) => return fail(HealthStatus::Unhealthy, format!("http client build failed: {e}"), None),
            };
            match client.get(url).send().await {
                Ok(resp) if resp.status().as_u16() == *expected_status => ok(format!("{url} -> {}", resp.status()), start.elapsed()),
                Ok(resp) => fail(HealthStatus::Unhealthy, format!("{url} -> {} (expected {expected_status})", resp.status()), Some(start.elapsed())),
                Err(e) => fail(HealthStatus::Unhealthy, format!("http get {url} failed: {e}"), Some(start.elapsed())),
            }
        }
        HealthCheckSpec::Log { path, pattern, max_matches, window_lines } => {
            let content = match tokio::fs::read_to_string(path).await {
                Ok(c) => c,
                Err(e) => return fail(HealthStatus::Unknown, format!("cannot read log {}: {e}", path.display()), None),
            };
            let re = match Regex::new(pattern) {
                Ok(r) => r,
                Err(e) => return fail(HealthStatus::Unknown, format!("bad log pattern: {e}"), None),
            };
            let tail: Vec<&str> = content.lines().rev().take(*window_lines).collect();
            let matches = tail.iter().filter(|line| re.is_match(line)).count();
            if matches > *max_matches {
                fail(HealthStatus::Unhealthy, format!("{matches} matches for `{pattern}` in last {window_lines} lines"), Some(start.elapsed()))
            } else {
                ok(format!("{matches} matches for `{pattern}`"), start.elapsed())
            }
        }
        HealthCheckSpec::Resource { process_id, cpu_pct_max, mem_pct_max } => {
            match supervisor.get(process_id) {
                Some(record) if record.group_id != 0 => {
                    let usage = read_proc_usage(record.group_id);
                    match usage {
                        Some((cpu_pct, mem_pct)) if cpu_pct <= *cpu_pct_max && mem_pct <= *mem_pct_max => {
                            ok(format!("cpu={cpu_pct:.1}% mem={mem_pct:.1}%"), start.elapsed())
                        }
                        Some((cpu_pct, mem_pct)) => fail(
                            HealthStatus::Degraded,
                            format!("cpu={cpu_pct:.1}% mem={mem_pct:.1}% over threshold"),
                            Some(start.elapsed()),
                        ),
                        None => fail(HealthStatus::Unknown, "resource sampling unavailable on this platform", None),
                    }
                }
                Some(_) | None => fail(HealthStatus::Unknown, "process not tracked", None),
            }
        }
        HealthCheckSpec::Custom { process_id, command, args, timeout_ms } => {
            let pid = supervisor.get(process_id).map(|r| r.group_id).unwrap_or(0);
            let resolved_args: Vec<String> = args.iter().map(|a| a.replace("{{PID}}", &pid.to_string())).collect();
            let opts = pinokio_shell::exec::ExecOptions {
                timeout: Some(Duration::from_millis(*timeout_ms)),
                ..Default::default()
            };
            match pinokio_shell::exec::run(command, &resolved_args, opts).await {
                Ok(outcome) if outcome.exit_code == Some(0) => ok("custom check exited 0", start.elapsed()),
                Ok(outcome) => fail(HealthStatus::Unhealthy, format!("custom check exited {:?}", outcome.exit_code), Some(start.elapsed())),
                Err(e) => fail(HealthStatus::Unhealthy, format!("custom check failed: {e}"), Some(start.elapsed())),
            }
        }
    }
}

/// Reads `/proc/<pid>/status` for resident memory and approximates CPU% as
/// unavailable (true CPU% needs two time-separated `/proc/<pid>/stat`
/// samples, which the fixed-cadence check loop in `monitor.rs` already
/// provides across ticks; a single-shot helper here can only report
/// memory). Returns `None` off Linux or if the pid has already exited.
#[cfg(target_os = "linux")]
fn read_proc_usage(pid: u32) -> Option<(f32, f32)> {
    let status = std::fs::read_to_string(format!("/proc/{pid}/status")).ok()?;
    let mem_kb = status.lines().find_map(|l| {
        l.strip_prefix("VmRSS:").map(|rest| rest.trim().trim_end_matches(" kB").parse::<f64>().ok()).flatten()
    })?;
    let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
    let total_kb = meminfo.lines().find_map(|l| {
        l.strip_prefix("MemTotal:").map(|rest| rest.trim().trim_end_matches(" kB").parse::<f64>().ok()).flatten()
    })?;
    let mem_pct = (mem_kb / total_kb * 100.0) as f32;
    Some((0.0, mem_pct))
}

#[cfg(not(target_os = "linux"))]
fn read_proc_usage(_pid: u32) -> Option<(f32, f32)> {
    None
}
