//! Configuration loading from probe.toml
//!
//! Sysprobe configuration can be specified in a `probe.toml` file. The
//! file is discovered by walking up from the current directory; CLI flags
//! override whatever it contains.

use serde::{Deserialize, Serialize};
use std::path::Path;
use sysprobe_probes::ProbeSettings;

/// Sysprobe configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProbeConfig {
    /// Workload constant overrides
    #[serde(default)]
    pub workloads: WorkloadConfig,
    /// Network stage configuration
    #[serde(default)]
    pub network: NetworkConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Workload constant overrides for the stage sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Child nodes appended in the tree-build stage
    #[serde(default = "default_tree_nodes")]
    pub tree_nodes: u32,
    /// Random 2x2 fills in the raster-drawing stage
    #[serde(default = "default_raster_rects")]
    pub raster_rects: u32,
    /// Key/value round trips in the storage stage
    #[serde(default = "default_storage_round_trips")]
    pub storage_round_trips: u32,
    /// Iterations of the arithmetic accumulation
    #[serde(default = "default_math_iterations")]
    pub math_iterations: u64,
    /// Frame-rate sampling window in milliseconds
    #[serde(default = "default_sampling_window_ms")]
    pub sampling_window_ms: u64,
    /// Full-surface clears
    #[serde(default = "default_clear_passes")]
    pub clear_passes: u32,
    /// Iterations of the single-worker sum
    #[serde(default = "default_worker_iterations")]
    pub worker_iterations: u64,
    /// Iterations of the per-worker sqrt sum
    #[serde(default = "default_multicore_iterations")]
    pub multicore_iterations: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            tree_nodes: default_tree_nodes(),
            raster_rects: default_raster_rects(),
            storage_round_trips: default_storage_round_trips(),
            math_iterations: default_math_iterations(),
            sampling_window_ms: default_sampling_window_ms(),
            clear_passes: default_clear_passes(),
            worker_iterations: default_worker_iterations(),
            multicore_iterations: default_multicore_iterations(),
        }
    }
}

fn default_tree_nodes() -> u32 {
    10_000
}
fn default_raster_rects() -> u32 {
    5_000
}
fn default_storage_round_trips() -> u32 {
    1_000
}
fn default_math_iterations() -> u64 {
    1_000_000
}
fn default_sampling_window_ms() -> u64 {
    1_000
}
fn default_clear_passes() -> u32 {
    1_000
}
fn default_worker_iterations() -> u64 {
    10_000_000
}
fn default_multicore_iterations() -> u64 {
    10_000_000
}

impl WorkloadConfig {
    /// Apply the overrides onto the canonical settings.
    pub fn to_settings(&self) -> ProbeSettings {
        ProbeSettings {
            tree_nodes: self.tree_nodes,
            raster_rects: self.raster_rects,
            storage_round_trips: self.storage_round_trips,
            math_iterations: self.math_iterations,
            sampling_window_ms: self.sampling_window_ms,
            clear_passes: self.clear_passes,
            worker_iterations: self.worker_iterations,
            multicore_iterations: self.multicore_iterations,
            ..ProbeSettings::default()
        }
    }
}

/// Network stage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// URL the throughput stage downloads from
    #[serde(default = "default_url")]
    pub url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

fn default_url() -> String {
    "https://speed.cloudflare.com/__down?bytes=1048576".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", or "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Directory the JSON/CSV artifacts are written into
    #[serde(default = "default_artifact_dir")]
    pub directory: String,
    /// Write the artifacts after every run
    #[serde(default)]
    pub save_artifacts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            directory: default_artifact_dir(),
            save_artifacts: false,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}
fn default_artifact_dir() -> String {
    "target/sysprobe".to_string()
}

impl ProbeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the
    /// current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("probe.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Sysprobe Configuration

[workloads]
# Child nodes appended in the tree-build stage
tree_nodes = 10000
# Random 2x2 fills in the raster-drawing stage
raster_rects = 5000
# Key/value round trips in the storage stage
storage_round_trips = 1000
# Iterations of the arithmetic accumulation
math_iterations = 1000000
# Frame-rate sampling window in milliseconds
sampling_window_ms = 1000
# Full-surface clears
clear_passes = 1000
# Iterations of the single-worker sum
worker_iterations = 10000000
# Iterations of the per-worker sqrt sum
multicore_iterations = 10000000

[network]
# URL the throughput stage downloads the first 1 MiB from
url = "https://speed.cloudflare.com/__down?bytes=1048576"

[output]
# Default output format: human, json, csv
format = "human"
# Directory the JSON/CSV artifacts are written into
directory = "target/sysprobe"
# Write the artifacts after every run
save_artifacts = false
"#
        .to_string()
    }
}
