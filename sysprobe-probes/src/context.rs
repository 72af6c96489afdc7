//! Probe Context and Settings
//!
//! Shared state handed to every stage: workload constants, the capability
//! registry, the software framebuffer, the frame clock, the throughput
//! source, and the worker pool. Stages take `&mut ProbeContext` so the
//! raster stages can all draw into one shared framebuffer.

use crate::frames::{FrameClock, SystemFrameClock};
use crate::net::{HttpSource, ThroughputSource};
use crate::raster::Framebuffer;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sysprobe_core::{CapabilityRegistry, WorkerPool};

/// Workload constants for the stage sequence.
///
/// This is the canonical set; the hot values can be overridden through
/// configuration.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Child nodes appended in the tree-build stage.
    pub tree_nodes: u32,
    /// Random 2x2 fills in the raster-drawing stage.
    pub raster_rects: u32,
    /// Key/value write+read round trips in the storage stage.
    pub storage_round_trips: u32,
    /// Iterations of the sin*cos accumulation.
    pub math_iterations: u64,
    /// Frame-rate sampling window in milliseconds.
    pub sampling_window_ms: u64,
    /// Full-surface clears in the surface-clears stage.
    pub clear_passes: u32,
    /// Iterations of the single-worker sum.
    pub worker_iterations: u64,
    /// Iterations of the per-worker sqrt sum in the fan-out stage.
    pub multicore_iterations: u64,
    /// Arrays allocated in the memory stage.
    pub alloc_arrays: u32,
    /// Elements per allocated array.
    pub alloc_elements: u32,
    /// Random 50x50 fills in the fill-rate stage.
    pub fill_rects: u32,
    /// Bytes requested by the ranged throughput download.
    pub range_bytes: u64,
    /// Worker count fallback when the core count is unavailable.
    pub default_workers: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            tree_nodes: 10_000,
            raster_rects: 5_000,
            storage_round_trips: 1_000,
            math_iterations: 1_000_000,
            sampling_window_ms: 1_000,
            clear_passes: 1_000,
            worker_iterations: 10_000_000,
            multicore_iterations: 10_000_000,
            alloc_arrays: 50,
            alloc_elements: 1_000_000,
            fill_rects: 200,
            range_bytes: 1_048_576,
            default_workers: 4,
        }
    }
}

impl ProbeSettings {
    /// Tiny workloads for fast tests.
    pub fn minimal() -> Self {
        Self {
            tree_nodes: 100,
            raster_rects: 50,
            storage_round_trips: 10,
            math_iterations: 1_000,
            sampling_window_ms: 50,
            clear_passes: 10,
            worker_iterations: 10_000,
            multicore_iterations: 10_000,
            alloc_arrays: 2,
            alloc_elements: 1_000,
            fill_rects: 5,
            range_bytes: 1_024,
            default_workers: 2,
        }
    }
}

/// Shared state for one run of the stage sequence.
pub struct ProbeContext {
    /// Workload constants.
    pub settings: ProbeSettings,
    /// Capability lookup.
    pub registry: CapabilityRegistry,
    /// Software render target shared by the raster stages.
    pub framebuffer: Framebuffer,
    /// Frame tick source for the sampling and latency stages.
    pub clock: Box<dyn FrameClock + Send>,
    /// Download source for the throughput stage.
    pub net: Box<dyn ThroughputSource + Send>,
    /// Fan-out pool for the multi-core stage.
    pub pool: WorkerPool,
    /// Randomness for raster coordinates and colors.
    pub rng: StdRng,
}

impl ProbeContext {
    /// Context wired to the host: platform capability probes, a 60 Hz
    /// frame clock, and an HTTP throughput source.
    pub fn from_host(settings: ProbeSettings, url: impl Into<String>) -> Self {
        let pool = WorkerPool::from_host(settings.default_workers);
        Self {
            pool,
            registry: CapabilityRegistry::with_host_probes(),
            framebuffer: Framebuffer::new(400, 200),
            clock: Box::new(SystemFrameClock::at_60hz()),
            net: Box::new(HttpSource::new(url)),
            rng: StdRng::from_entropy(),
            settings,
        }
    }

    /// Context with injected collaborators, for tests and simulations.
    pub fn with_parts(
        settings: ProbeSettings,
        registry: CapabilityRegistry,
        clock: Box<dyn FrameClock + Send>,
        net: Box<dyn ThroughputSource + Send>,
        pool: WorkerPool,
    ) -> Self {
        Self {
            framebuffer: Framebuffer::new(400, 200),
            rng: StdRng::seed_from_u64(0x5f3759df),
            settings,
            registry,
            clock,
            net,
            pool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_canonical_constants() {
        let settings = ProbeSettings::default();
        assert_eq!(settings.tree_nodes, 10_000);
        assert_eq!(settings.raster_rects, 5_000);
        assert_eq!(settings.sampling_window_ms, 1_000);
        assert_eq!(settings.range_bytes, 1_048_576);
        assert_eq!(settings.default_workers, 4);
    }
}
