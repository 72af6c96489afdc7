#![warn(missing_docs)]
//! # Sysprobe
//!
//! Host hardware and performance probes behind a staged benchmark runner:
//! - **Fixed stage sequence**: fifteen single-shot probes covering tree
//!   building, software rasterization, storage round trips, arithmetic,
//!   frame-rate sampling, worker fan-out, network throughput, and the
//!   host's battery, GPU, memory, and sensor facilities
//! - **Capability gating**: stages that need a host facility check a
//!   tri-state registry first and report `"{stage} not supported"`
//!   instead of failing
//! - **Failure isolation**: a failing or panicking stage contributes a
//!   failure line and the run continues
//! - **Baseline comparison**: timed stages score against fixed reference
//!   values on supplemental lines
//! - **Exports**: human-readable terminal output plus JSON and CSV
//!   artifacts of the transcript
//!
//! ## Quick Start
//!
//! ```no_run
//! use sysprobe::{ProbeContext, ProbeSettings, Runner};
//!
//! let context = ProbeContext::from_host(
//!     ProbeSettings::default(),
//!     "https://speed.cloudflare.com/__down?bytes=1048576",
//! );
//! let mut runner = Runner::new(context);
//! let transcript = runner.run().expect("first run");
//! for line in transcript.texts() {
//!     println!("{line}");
//! }
//! ```

// Re-export core types
pub use sysprobe_core::{
    Capability, CapabilityRegistry, CapabilityState, FanInResult, ProbeError, RunController,
    Stopwatch, TaskSpec, WorkerPool, Workload, fan_in_mean,
};

// Re-export the stage machinery
pub use sysprobe_probes::{
    BASELINE, BaselineEntry, FrameClock, Framebuffer, HttpSource, ProbeContext, ProbeSettings,
    Runner, SimulatedFrameClock, SimulatedSource, StageDef, StageOutcome, ThroughputSample,
    ThroughputSource, baseline_entry, baseline_percent, stage_sequence,
};

// Re-export the transcript and its renderers
pub use sysprobe_report::{
    CSV_ARTIFACT, HardwareInfo, JSON_ARTIFACT, LineKind, OutputFormat, ResultLine, Transcript,
    collect_hardware_info, format_human_output, transcript_to_csv, transcript_to_json,
    write_artifacts,
};

/// Run the sysprobe CLI harness.
///
/// Call this from a binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     sysprobe::run()
/// }
/// ```
pub use sysprobe_cli::run;
