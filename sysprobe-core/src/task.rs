//! Worker Task Descriptors
//!
//! Fan-out workers receive a named, versioned description of what to
//! compute instead of an ad-hoc inline payload. The version bumps whenever
//! a workload's semantics change, so recorded results stay comparable.

/// Computation payload a worker executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    /// Sum the integers `0..iterations` (wrapping).
    SumSequence {
        /// Number of loop iterations.
        iterations: u64,
    },
    /// Sum the square roots of `0..iterations`.
    SumSqrt {
        /// Number of loop iterations.
        iterations: u64,
    },
}

impl Workload {
    /// Execute the payload and return the accumulated value.
    ///
    /// The caller is expected to wrap the call in `std::hint::black_box`
    /// when the result itself is unused.
    pub fn execute(self) -> f64 {
        match self {
            Workload::SumSequence { iterations } => {
                let mut total = 0u64;
                for i in 0..iterations {
                    total = total.wrapping_add(std::hint::black_box(i));
                }
                total as f64
            }
            Workload::SumSqrt { iterations } => {
                let mut total = 0f64;
                for i in 0..iterations {
                    total += std::hint::black_box(i as f64).sqrt();
                }
                total
            }
        }
    }
}

/// Named, versioned task handed to the worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    /// Short identifier, also used in worker thread names.
    pub name: &'static str,
    /// Workload revision.
    pub version: u32,
    /// What the worker computes.
    pub workload: Workload,
}

impl TaskSpec {
    /// Build a task descriptor.
    pub const fn new(name: &'static str, version: u32, workload: Workload) -> Self {
        Self {
            name,
            version,
            workload,
        }
    }
}
