//! Hardware Info Collection
//!
//! Best-effort host identification shown at the top of the human report.
//! Linux-specific values (CPU model, memory) degrade to "Unknown" / 0 on
//! other platforms.

use serde::{Deserialize, Serialize};

/// Best-effort host hardware description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareInfo {
    /// Operating system name.
    pub platform: String,
    /// CPU architecture.
    pub arch: String,
    /// CPU model string, or "Unknown".
    pub cpu: String,
    /// Logical core count.
    pub logical_cores: u32,
    /// Total memory in GB, or 0.0 when unreadable.
    pub memory_gb: f64,
}

/// Collect hardware info from the host.
pub fn collect_hardware_info() -> HardwareInfo {
    HardwareInfo {
        platform: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        logical_cores: logical_cores(),
        memory_gb: memory_gb().unwrap_or(0.0),
    }
}

fn logical_cores() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

#[cfg(target_os = "linux")]
fn cpu_model() -> Option<String> {
    let cpuinfo = std::fs::read_to_string("/proc/cpuinfo").ok()?;
    cpuinfo
        .lines()
        .find(|l| l.starts_with("model name"))
        .and_then(|l| l.split(':').nth(1))
        .map(|s| s.trim().to_string())
}

#[cfg(not(target_os = "linux"))]
fn cpu_model() -> Option<String> {
    None
}

#[cfg(target_os = "linux")]
fn memory_gb() -> Option<f64> {
    let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
    let kb = meminfo
        .lines()
        .find(|l| l.starts_with("MemTotal"))?
        .split_whitespace()
        .nth(1)?
        .parse::<u64>()
        .ok()?;
    Some(kb as f64 / 1024.0 / 1024.0)
}

#[cfg(not(target_os = "linux"))]
fn memory_gb() -> Option<f64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_always_produces_a_platform() {
        let info = collect_hardware_info();
        assert!(!info.platform.is_empty());
        assert!(info.logical_cores >= 1);
    }

    #[test]
    fn info_round_trips_through_json() {
        let info = collect_hardware_info();
        let json = serde_json::to_string(&info).expect("serialize");
        let back: HardwareInfo = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.platform, info.platform);
    }
}
