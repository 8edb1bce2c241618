// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text/JSON rendering shared across every subcommand. `--json` (spec §6)
//! switches every printer below from the human table to
//! `serde_json::to_string_pretty` of the same payload.

use crate::color;
use clap::ValueEnum;
use pinokio_core::{
    Alert, AppProfile, AppState, AppStateRecord, Event, ProcessRecord, ProcessStatus, TunnelRecord, TunnelStatus,
};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Prints `value` as pretty JSON; used for the handful of payloads the
    /// CLI never re-derives a Rust type for (cache stats, perf samples,
    /// recovery patterns/history all cross the wire as `serde_json::Value`
    /// since `pinokio-api` does not depend on their owning crates).
    pub fn print_json_value(self, label: &str, value: &serde_json::Value) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => {
                println!("{}", color::header(label));
                println!("{}", serde_json::to_string_pretty(value)?);
            }
        }
        Ok(())
    }

    fn print_json<T: Serialize>(self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Dispatches to either pretty-JSON of `value` or a caller-supplied text
    /// printer, avoiding a duplicated `if format == Json { .. } else { .. }`
    /// at every call site below.
    fn print_json_or<T: Serialize>(self, value: &T, text: impl FnOnce() -> anyhow::Result<()>) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => self.print_json(value),
            OutputFormat::Text => text(),
        }
    }
}

fn state_color(state: AppState, text: &str) -> String {
    match state {
        AppState::Running => color::good(text),
        AppState::Degraded
        | AppState::Starting
        | AppState::Installing
        | AppState::Analyzing
        | AppState::NeedsDeps
        | AppState::Stopping => color::warn(text),
        AppState::Failed => color::bad(text),
        AppState::Absent | AppState::Installed => color::context(text),
    }
}

fn process_status_color(status: ProcessStatus, text: &str) -> String {
    match status {
        ProcessStatus::Running | ProcessStatus::Starting => color::good(text),
        ProcessStatus::Stopping => color::warn(text),
        ProcessStatus::Exited | ProcessStatus::Zombie | ProcessStatus::Lost => color::bad(text),
    }
}

fn tunnel_status_color(status: TunnelStatus, text: &str) -> String {
    match status {
        TunnelStatus::Active => color::good(text),
        TunnelStatus::Pending | TunnelStatus::Degraded => color::warn(text),
        TunnelStatus::Closed | TunnelStatus::Failed => color::bad(text),
    }
}

pub fn print_apps(apps: &[AppStateRecord], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return format.print_json(apps);
    }
    if apps.is_empty() {
        println!("{}", color::muted("no apps installed"));
        return Ok(());
    }
    println!("{:<28} {:<12} {}", color::header("APP"), color::header("STATUS"), color::header("INSTALLED"));
    for app in apps {
        let status = format!("{:?}", app.status).to_lowercase();
        let installed = app.installed_at.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".to_string());
        println!("{:<28} {:<12} {}", app.app_id, state_color(app.status, &status), color::context(&installed));
    }
    Ok(())
}

pub fn print_app_state(state: &AppStateRecord, format: OutputFormat) -> anyhow::Result<()> {
    format.print_json_or(state, || {
        let status = format!("{:?}", state.status).to_lowercase();
        println!("{:<14} {}", color::header("app"), state.app_id);
        println!("{:<14} {}", color::header("status"), state_color(state.status, &status));
        if let Some(hash) = &state.profile_hash {
            println!("{:<14} {}", color::header("profile_hash"), color::context(hash));
        }
        if let Some(t) = state.installed_at {
            println!("{:<14} {}", color::header("installed_at"), color::context(&t.to_rfc3339()));
        }
        if let Some(t) = state.last_run_at {
            println!("{:<14} {}", color::header("last_run_at"), color::context(&t.to_rfc3339()));
        }
        if let Some(failure) = &state.failure {
            println!(
                "{:<14} {} (step {:?}): {}",
                color::header("failure"),
                color::bad(&format!("{:?}", failure.kind)),
                failure.step,
                failure.message
            );
            for line in &failure.log_tail {
                println!("  {}", color::muted(line));
            }
        }
        Ok(())
    })
}

pub fn print_profile(profile: &AppProfile, format: OutputFormat) -> anyhow::Result<()> {
    format.print_json_or(profile, || {
        println!("{:<18} {}", color::header("app"), profile.id);
        println!("{:<18} {:?}", color::header("category"), profile.category);
        println!("{:<18} {:?}", color::header("complexity"), profile.complexity);
        println!("{:<18} {:?}", color::header("installer_kind"), profile.installer_kind);
        println!("{:<18} {:?}", color::header("ui_kind"), profile.ui_kind);
        println!("{:<18} {}", color::header("needs_tunnel"), profile.needs_tunnel);
        if let Some(port) = profile.port {
            println!("{:<18} {}", color::header("port"), port);
        }
        println!(
            "{:<18} pip={} conda={} npm={} system={}",
            color::header("deps"),
            profile.deps.pip.len(),
            profile.deps.conda.len(),
            profile.deps.npm.len(),
            profile.deps.system.len()
        );
        println!("{:<18} {}", color::header("hash"), color::context(&profile.hash));
        Ok(())
    })
}

pub fn print_processes(processes: &[ProcessRecord], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return format.print_json(processes);
    }
    if processes.is_empty() {
        println!("{}", color::muted("no tracked processes"));
        return Ok(());
    }
    println!(
        "{:<14} {:<20} {:<10} {:<6} {}",
        color::header("ID"),
        color::header("APP"),
        color::header("STATUS"),
        color::header("GROUP"),
        color::header("PORTS")
    );
    for p in processes {
        let status = format!("{:?}", p.status).to_lowercase();
        let ports = if p.ports_owned.is_empty() {
            "-".to_string()
        } else {
            p.ports_owned.iter().map(u16::to_string).collect::<Vec<_>>().join(",")
        };
        println!(
            "{:<14} {:<20} {:<10} {:<6} {}",
            p.id,
            p.app_id,
            process_status_color(p.status, &status),
            p.group_id,
            color::context(&ports)
        );
    }
    Ok(())
}

pub fn print_process(process: &ProcessRecord, format: OutputFormat) -> anyhow::Result<()> {
    format.print_json_or(process, || {
        let status = format!("{:?}", process.status).to_lowercase();
        println!("{:<16} {}", color::header("id"), process.id);
        println!("{:<16} {}", color::header("app"), process.app_id);
        println!("{:<16} {}", color::header("status"), process_status_color(process.status, &status));
        println!("{:<16} {}", color::header("command"), process.command.join(" "));
        println!("{:<16} {}", color::header("workdir"), process.workdir.display());
        println!("{:<16} {}", color::header("started_at"), process.started_at.to_rfc3339());
        println!("{:<16} {}", color::header("restart_count"), process.restart_count);
        if let Some(code) = process.last_exit_code {
            println!("{:<16} {}", color::header("last_exit_code"), code);
        }
        Ok(())
    })
}

pub fn print_tunnels(tunnels: &[TunnelRecord], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return format.print_json(tunnels);
    }
    if tunnels.is_empty() {
        println!("{}", color::muted("no tunnels"));
        return Ok(());
    }
    println!(
        "{:<14} {:<12} {:<10} {:<6} {}",
        color::header("ID"),
        color::header("PROVIDER"),
        color::header("STATUS"),
        color::header("PORT"),
        color::header("URL")
    );
    for t in tunnels {
        let status = format!("{:?}", t.status).to_lowercase();
        println!(
            "{:<14} {:<12} {:<10} {:<6} {}",
            t.id,
            format!("{:?}", t.provider).to_lowercase(),
            tunnel_status_color(t.status, &status),
            t.local_port,
            color::literal(t.url.as_deref().unwrap_or("-"))
        );
    }
    Ok(())
}

pub fn print_tunnel(tunnel: &TunnelRecord, format: OutputFormat) -> anyhow::Result<()> {
    format.print_json_or(tunnel, || {
        let status = format!("{:?}", tunnel.status).to_lowercase();
        println!("{:<16} {}", color::header("id"), tunnel.id);
        println!("{:<16} {:?}", color::header("provider"), tunnel.provider);
        println!("{:<16} {}", color::header("status"), tunnel_status_color(tunnel.status, &status));
        println!("{:<16} {}", color::header("local_port"), tunnel.local_port);
        println!("{:<16} {}", color::header("url"), color::literal(tunnel.url.as_deref().unwrap_or("-")));
        println!(
            "{:<16} requests={} rtt_ema_ms={:.1} bytes_in={} bytes_out={}",
            color::header("metrics"),
            tunnel.metrics.requests,
            tunnel.metrics.rtt_ema_ms,
            tunnel.metrics.bytes_in,
            tunnel.metrics.bytes_out
        );
        Ok(())
    })
}

pub fn print_alerts(alerts: &[Alert], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return format.print_json(alerts);
    }
    if alerts.is_empty() {
        println!("{}", color::muted("no alerts"));
        return Ok(());
    }
    println!(
        "{:<10} {:<8} {:<16} {:<10} {:<10} {}",
        color::header("SEVERITY"),
        color::header("STATE"),
        color::header("METRIC"),
        color::header("VALUE"),
        color::header("THRESHOLD"),
        color::header("OPENED")
    );
    for alert in alerts {
        let severity = format!("{:?}", alert.severity).to_lowercase();
        let severity_colored = match alert.severity {
            pinokio_core::AlertSeverity::Critical | pinokio_core::AlertSeverity::High => color::bad(&severity),
            pinokio_core::AlertSeverity::Medium => color::warn(&severity),
            pinokio_core::AlertSeverity::Low => color::context(&severity),
        };
        let state = if alert.is_open() { "open" } else { "closed" };
        println!(
            "{:<10} {:<8} {:<16} {:<10.1} {:<10.1} {}",
            severity_colored,
            state,
            alert.metric,
            alert.value,
            alert.threshold,
            color::context(&alert.opened_at.to_rfc3339())
        );
        for rec in &alert.recommendations {
            println!("  - {}", color::muted(rec));
        }
    }
    Ok(())
}

pub fn print_event(event: &Event, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(event)?),
        OutputFormat::Text => println!("{}", color::context(&format!("{event:?}"))),
    }
    Ok(())
}
