// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! System resource sampling. Grounded on
//! `original_source/Agent/github_repo/optimization/performance_monitor.py`'s
//! `_collect_metrics`, reimplemented against `/proc` directly rather than a
//! `psutil`-equivalent crate, matching `health/src/checks.rs`'s precedent of
//! reading `/proc/<pid>/status` for resource numbers with no added
//! dependency. GPU sampling has no counterpart here for the same reason
//! `checks.rs`'s CPU% helper punts on Linux-only data: nvml bindings are not
//! part of this workspace's dependency stack, so `gpu_percent` always
//! reports unavailable rather than fabricating a reading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sample {
    pub t: DateTime<Utc>,
    pub cpu_pct: f32,
    pub mem_pct: f32,
    pub mem_used_mb: u64,
    pub mem_total_mb: u64,
    pub disk_pct: f32,
    pub disk_used_mb: u64,
    pub disk_total_mb: u64,
    pub gpu_pct: Option<f32>,
    pub network_bytes_total: u64,
    pub process_count: u32,
}

/// Running totals needed to turn two `/proc/stat` reads into a CPU
/// percentage (a single snapshot only gives cumulative ticks).
#[derive(Debug, Clone, Copy, Default)]
struct CpuTicks {
    idle: u64,
    total: u64,
}

pub struct Collector {
    base_path: std::path::PathBuf,
    last_cpu: Option<CpuTicks>,
}

impl Collector {
    pub fn new(base_path: &Path) -> Self {
        Self { base_path: base_path.to_path_buf(), last_cpu: None }
    }

    pub fn sample(&mut self) -> Sample {
        let cpu_pct = self.sample_cpu();
        let (mem_used_mb, mem_total_mb, mem_pct) = sample_memory();
        let (disk_used_mb, disk_total_mb, disk_pct) = sample_disk(&self.base_path);

        Sample {
            t: Utc::now(),
            cpu_pct,
            mem_pct,
            mem_used_mb,
            mem_total_mb,
            disk_pct,
            disk_used_mb,
            disk_total_mb,
            gpu_pct: None,
            network_bytes_total: sample_network(),
            process_count: sample_process_count(),
        }
    }
}

#[cfg(target_os = "linux")]
fn read_cpu_ticks() -> Option<CpuTicks> {
    let content = std::fs::read_to_string("/proc/stat").ok()?;
    let line = content.lines().next()?;
    let fields: Vec<u64> = line.split_whitespace().skip(1).filter_map(|f| f.parse().ok()).collect();
    if fields.len() < 5 {
        return None;
    }
    let idle = fields[3] + fields.get(4).copied().unwrap_or(0);
    let total: u64 = fields.iter().sum();
    Some(CpuTicks { idle, total })
}

#[cfg(not(target_os = "linux"))]
fn read_cpu_ticks() -> Option<CpuTicks> {
    None
}

impl Collector {
    fn sample_cpu(&mut self) -> f32 {
        let Some(now) = read_cpu_ticks() else { return 0.0 };
        let pct = match self.last_cpu {
            Some(prev) => {
                let total_delta = now.total.saturating_sub(prev.total);
                let idle_delta = now.idle.saturating_sub(prev.idle);
                if total_delta == 0 {
                    0.0
                } else {
                    (1.0 - (idle_delta as f64 / total_delta as f64)) as f32 * 100.0
                }
            }
            None => 0.0,
        };
        self.last_cpu = Some(now);
        pct
    }
}

#[cfg(target_os = "linux")]
fn sample_memory() -> (u64, u64, f32) {
    let Ok(content) = std::fs::read_to_string("/proc/meminfo") else { return (0, 0, 0.0) };
    let field = |name: &str| -> Option<u64> {
        content.lines().find_map(|l| l.strip_prefix(name).map(|rest| rest.trim().trim_end_matches(" kB").parse::<u64>().ok()).flatten())
    };
    let total_kb = field("MemTotal:").unwrap_or(0);
    let available_kb = field("MemAvailable:").unwrap_or(0);
    let used_kb = total_kb.saturating_sub(available_kb);
    let pct = if total_kb == 0 { 0.0 } else { (used_kb as f64 / total_kb as f64 * 100.0) as f32 };
    (used_kb / 1024, total_kb / 1024, pct)
}

#[cfg(not(target_os = "linux"))]
fn sample_memory() -> (u64, u64, f32) {
    (0, 0, 0.0)
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn sample_disk(path: &Path) -> (u64, u64, f32) {
    use std::ffi::CString;
    let Ok(c_path) = CString::new(path.as_os_str().to_string_lossy().as_bytes()) else {
        return (0, 0, 0.0);
    };
    // SAFETY: `statvfs` only reads `c_path` and writes into the stack-local
    // `buf` we pass; both outlive the call.
    let mut buf: libc::statvfs = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut buf) };
    if rc != 0 {
        return (0, 0, 0.0);
    }
    let block_size = buf.f_frsize.max(buf.f_bsize) as u64;
    let total = buf.f_blocks * block_size;
    let free = buf.f_bavail * block_size;
    let used = total.saturating_sub(free);
    let pct = if total == 0 { 0.0 } else { (used as f64 / total as f64 * 100.0) as f32 };
    (used / (1024 * 1024), total / (1024 * 1024), pct)
}

#[cfg(not(unix))]
fn sample_disk(_path: &Path) -> (u64, u64, f32) {
    (0, 0, 0.0)
}

#[cfg(target_os = "linux")]
fn sample_network() -> u64 {
    let Ok(content) = std::fs::read_to_string("/proc/net/dev") else { return 0 };
    content
        .lines()
        .skip(2)
        .filter(|l| !l.trim_start().starts_with("lo:"))
        .filter_map(|l| {
            let (_, rest) = l.split_once(':')?;
            let fields: Vec<&str> = rest.split_whitespace().collect();
            let rx: u64 = fields.first()?.parse().ok()?;
            let tx: u64 = fields.get(8)?.parse().ok()?;
            Some(rx + tx)
        })
        .sum()
}

#[cfg(not(target_os = "linux"))]
fn sample_network() -> u64 {
    0
}

#[cfg(target_os = "linux")]
fn sample_process_count() -> u32 {
    let Ok(entries) = std::fs::read_dir("/proc") else { return 0 };
    entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().chars().all(|c| c.is_ascii_digit()))
        .count() as u32
}

#[cfg(not(target_os = "linux"))]
fn sample_process_count() -> u32 {
    0
}

#[cfg(test)]
#[path = "sample_tests.rs"]
mod tests;
