//! Capability Registry
//!
//! Stages never reach for a platform interface blindly. Each one that
//! depends on host support declares a `Capability`, and the registry
//! answers with a tri-state: supported, unsupported, or unknown. Probes
//! run lazily and the answer is cached for the rest of the run.

use std::collections::HashMap;
use std::sync::Mutex;

/// Host capabilities a stage may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Background worker threads can be spawned.
    Workers,
    /// A GPU render surface is present (drawing/clear stages).
    GpuSurface,
    /// GPU identification data is readable.
    GpuInfo,
    /// A battery power supply is exposed by the platform.
    Battery,
    /// Outbound network access for the throughput stage.
    Network,
    /// Platform sensor interfaces are enumerable.
    Sensors,
}

impl Capability {
    /// Every capability the registry knows about, in display order.
    pub const ALL: [Capability; 6] = [
        Capability::Workers,
        Capability::GpuSurface,
        Capability::GpuInfo,
        Capability::Battery,
        Capability::Network,
        Capability::Sensors,
    ];

    /// Stable display name.
    pub fn name(self) -> &'static str {
        match self {
            Capability::Workers => "workers",
            Capability::GpuSurface => "gpu-surface",
            Capability::GpuInfo => "gpu-info",
            Capability::Battery => "battery",
            Capability::Network => "network",
            Capability::Sensors => "sensors",
        }
    }
}

/// Result of probing one capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityState {
    /// The interface exists and can be used.
    Supported,
    /// The interface is definitively absent.
    Unsupported,
    /// Presence could not be determined on this platform.
    Unknown,
}

impl CapabilityState {
    /// Whether a stage may proceed. `Unknown` is treated as unusable at
    /// the stage boundary but reported distinctly by `list`.
    pub fn is_supported(self) -> bool {
        matches!(self, CapabilityState::Supported)
    }
}

type ProbeFn = Box<dyn Fn() -> CapabilityState + Send + Sync>;

/// Lazy, cached capability lookup.
pub struct CapabilityRegistry {
    probes: HashMap<Capability, ProbeFn>,
    cache: Mutex<HashMap<Capability, CapabilityState>>,
}

impl CapabilityRegistry {
    /// Empty registry; every lookup answers `Unknown`.
    pub fn new() -> Self {
        Self {
            probes: HashMap::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Registry wired to the host platform probes.
    pub fn with_host_probes() -> Self {
        let mut registry = Self::new();
        registry.register(Capability::Workers, probe_workers);
        registry.register(Capability::GpuSurface, probe_gpu);
        registry.register(Capability::GpuInfo, probe_gpu);
        registry.register(Capability::Battery, probe_battery);
        registry.register(Capability::Network, || CapabilityState::Supported);
        registry.register(Capability::Sensors, probe_sensors);
        registry
    }

    /// Register (or replace) the probe for a capability.
    pub fn register<F>(&mut self, capability: Capability, probe: F)
    where
        F: Fn() -> CapabilityState + Send + Sync + 'static,
    {
        self.probes.insert(capability, Box::new(probe));
        if let Ok(mut cache) = self.cache.lock() {
            cache.remove(&capability);
        }
    }

    /// Pin a capability to a fixed state, bypassing its probe.
    pub fn set(&mut self, capability: Capability, state: CapabilityState) {
        self.register(capability, move || state);
    }

    /// Current state of a capability, probing on first use.
    pub fn state(&self, capability: Capability) -> CapabilityState {
        if let Ok(cache) = self.cache.lock() {
            if let Some(state) = cache.get(&capability) {
                return *state;
            }
        }

        let state = self
            .probes
            .get(&capability)
            .map(|probe| probe())
            .unwrap_or(CapabilityState::Unknown);

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(capability, state);
        }
        tracing::debug!(capability = capability.name(), ?state, "capability probed");
        state
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn probe_workers() -> CapabilityState {
    match std::thread::Builder::new()
        .name("sysprobe-capability".to_string())
        .spawn(|| {})
    {
        Ok(handle) => {
            let _ = handle.join();
            CapabilityState::Supported
        }
        Err(_) => CapabilityState::Unsupported,
    }
}

#[cfg(target_os = "linux")]
fn probe_gpu() -> CapabilityState {
    if std::path::Path::new("/dev/dri").exists() {
        CapabilityState::Supported
    } else {
        CapabilityState::Unsupported
    }
}

#[cfg(not(target_os = "linux"))]
fn probe_gpu() -> CapabilityState {
    CapabilityState::Unknown
}

#[cfg(target_os = "linux")]
fn probe_battery() -> CapabilityState {
    let Ok(entries) = std::fs::read_dir("/sys/class/power_supply") else {
        return CapabilityState::Unsupported;
    };
    for entry in entries.flatten() {
        if entry.file_name().to_string_lossy().starts_with("BAT") {
            return CapabilityState::Supported;
        }
    }
    CapabilityState::Unsupported
}

#[cfg(not(target_os = "linux"))]
fn probe_battery() -> CapabilityState {
    CapabilityState::Unknown
}

#[cfg(target_os = "linux")]
fn probe_sensors() -> CapabilityState {
    match std::fs::read_dir("/sys/bus/iio/devices") {
        Ok(mut entries) => {
            if entries.next().is_some() {
                CapabilityState::Supported
            } else {
                CapabilityState::Unsupported
            }
        }
        Err(_) => CapabilityState::Unsupported,
    }
}

#[cfg(not(target_os = "linux"))]
fn probe_sensors() -> CapabilityState {
    CapabilityState::Unknown
}
