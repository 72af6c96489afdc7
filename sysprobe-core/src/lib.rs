#![warn(missing_docs)]
//! Sysprobe Core - Probe Runtime
//!
//! This crate provides the execution substrate for probe stages:
//! - `Stopwatch` for wall-clock stage timing
//! - Capability registry with tri-state probing
//! - Explicit run-once state (`RunController`)
//! - Versioned task descriptors and the worker fan-out/fan-in pool
//! - CPU affinity pinning for fan-out workers

mod capability;
mod error;
mod measure;
mod pool;
mod runstate;
mod task;

pub use capability::{Capability, CapabilityRegistry, CapabilityState};
pub use error::ProbeError;
pub use measure::{Stopwatch, pin_to_cpu};
pub use pool::{FanInResult, WorkerPool, fan_in_mean};
pub use runstate::RunController;
pub use task::{TaskSpec, Workload};
