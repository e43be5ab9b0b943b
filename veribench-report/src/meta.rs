//! System Metadata and Environment Fingerprint
//!
//! A report only describes one environment; aggregation across
//! machines or devices is a collaborator's job, keyed by the
//! fingerprint produced here. Linux-specific fields degrade to
//! "unknown"/zero elsewhere.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::report::ReportMeta;

/// Description of the machine a run executed on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name.
    pub os: String,
    /// CPU architecture.
    pub arch: String,
    /// CPU model string.
    pub cpu: String,
    /// Logical core count.
    pub cpu_cores: u32,
    /// Total system memory in GB.
    pub memory_gb: f64,
}

impl SystemInfo {
    /// Collect system information for the current machine.
    pub fn collect() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpu: cpu_model().unwrap_or_else(|| "unknown".to_string()),
            cpu_cores: num_cpus(),
            memory_gb: memory_gb().unwrap_or(0.0),
        }
    }

    /// Stable single-environment tag for keying stored reports.
    pub fn fingerprint(&self) -> String {
        let cpu: String = self
            .cpu
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        format!("{}-{}-{}-{}c", self.os, self.arch, cpu, self.cpu_cores)
    }
}

/// Build report metadata for a run finishing now.
pub fn build_report_meta() -> ReportMeta {
    ReportMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        system: SystemInfo::collect(),
    }
}

/// CPU model name from /proc/cpuinfo (Linux only).
fn cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

/// Total system memory in GB (Linux only).
fn memory_gb() -> Option<f64> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("MemTotal"))
                    .and_then(|l| {
                        l.split_whitespace()
                            .nth(1)
                            .and_then(|s| s.parse::<u64>().ok())
                    })
                    .map(|kb| kb as f64 / 1024.0 / 1024.0)
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}
