#![warn(missing_docs)]
//! Sysprobe Probes - Stage Implementations and Runner
//!
//! Each stage is an independent, single-shot measurement of one host
//! facility: elapsed time around a fixed workload, or a reported value.
//! The runner executes the fixed sequence strictly in order, appends one
//! primary transcript line per stage, and never lets a stage failure
//! escape the run.

mod baseline;
mod compute;
mod context;
mod frames;
mod gpu;
mod net;
mod power;
mod raster;
mod runner;
mod sensors;
mod storage;
mod tree;

pub use baseline::{BASELINE, BaselineEntry, baseline_entry, baseline_percent};
pub use context::{ProbeContext, ProbeSettings};
pub use frames::{FrameClock, SimulatedFrameClock, SystemFrameClock, sample_frame_rate};
pub use net::{HttpSource, SimulatedSource, ThroughputSample, ThroughputSource};
pub use raster::Framebuffer;
pub use runner::{Runner, StageDef, StageOutcome, stage_sequence};
