//! Compute Stages
//!
//! Arithmetic throughput, memory allocation/release, the single-worker
//! computation, and the multi-core fan-out. The two worker stages fall
//! back to an equivalent on-thread measurement when the worker capability
//! is unavailable, using the same task descriptor either way.

use crate::context::ProbeContext;
use crate::runner::StageOutcome;
use std::sync::mpsc;
use std::thread;
use sysprobe_core::{Capability, ProbeError, Stopwatch, TaskSpec, WorkerPool, Workload};

/// Task run by the single-worker stage.
const SEQUENCE_TASK: TaskSpec = TaskSpec::new(
    "sequence-sum",
    1,
    Workload::SumSequence {
        iterations: 10_000_000,
    },
);

/// Task fanned out to one worker per logical core.
const SQRT_TASK: TaskSpec = TaskSpec::new(
    "sqrt-sum",
    1,
    Workload::SumSqrt {
        iterations: 10_000_000,
    },
);

fn sequence_task(iterations: u64) -> TaskSpec {
    TaskSpec {
        workload: Workload::SumSequence { iterations },
        ..SEQUENCE_TASK
    }
}

fn sqrt_task(iterations: u64) -> TaskSpec {
    TaskSpec {
        workload: Workload::SumSqrt { iterations },
        ..SQRT_TASK
    }
}

/// Arithmetic stage: accumulate sin(i)*cos(i) over the configured range.
pub fn stage_arithmetic(cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let iterations = cx.settings.math_iterations;

    let watch = Stopwatch::start();
    let mut sum = 0f64;
    for i in 0..iterations {
        let x = i as f64;
        sum += x.sin() * x.cos();
    }
    let elapsed = watch.elapsed_ms();
    std::hint::black_box(sum);

    Ok(StageOutcome::timed_ms(elapsed))
}

/// Memory stage: allocate and fill N arrays, then release them, timing
/// both phases.
pub fn stage_memory(cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let arrays = cx.settings.alloc_arrays;
    let elements = cx.settings.alloc_elements as usize;

    let watch = Stopwatch::start();
    let mut buffers: Vec<Vec<u64>> = Vec::with_capacity(arrays as usize);
    for i in 0..arrays {
        buffers.push(vec![u64::from(i); elements]);
    }
    let alloc_ms = watch.elapsed_ms();

    let release_watch = Stopwatch::start();
    buffers.clear();
    std::hint::black_box(&buffers);
    let release_ms = release_watch.elapsed_ms();

    Ok(StageOutcome::new(format!(
        "allocated {:.2} ms, released {:.2} ms",
        alloc_ms, release_ms
    ))
    .with_metric(alloc_ms))
}

/// Single-worker stage: dispatch one background task and time
/// dispatch-to-report.
pub fn stage_worker_compute(cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let task = sequence_task(cx.settings.worker_iterations);

    if !cx.registry.state(Capability::Workers).is_supported() {
        // Same workload, measured on the calling thread.
        let result = WorkerPool::run_single_threaded(&task);
        return Ok(StageOutcome::new(format!(
            "{:.2} ms (single-thread fallback)",
            result.mean_ms
        ))
        .with_metric(result.mean_ms));
    }

    let (tx, rx) = mpsc::channel::<()>();
    let watch = Stopwatch::start();
    let workload = task.workload;
    thread::Builder::new()
        .name(format!("{}-v{}", task.name, task.version))
        .spawn(move || {
            std::hint::black_box(workload.execute());
            let _ = tx.send(());
        })
        .map_err(|e| ProbeError::stage(format!("failed to spawn worker: {e}")))?;

    rx.recv()
        .map_err(|_| ProbeError::stage("worker exited without reporting"))?;
    let elapsed = watch.elapsed_ms();

    Ok(StageOutcome::timed_ms(elapsed))
}

/// Multi-core stage: fan the sqrt task out to one worker per logical
/// core and report the mean of the individual durations.
pub fn stage_multicore(cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let task = sqrt_task(cx.settings.multicore_iterations);

    if !cx.registry.state(Capability::Workers).is_supported() {
        let result = WorkerPool::run_single_threaded(&task);
        return Ok(StageOutcome::new(format!(
            "{:.2} ms (single-thread fallback)",
            result.mean_ms
        ))
        .with_metric(result.mean_ms));
    }

    let result = cx.pool.fan_out(&task)?;
    Ok(StageOutcome::new(format!(
        "{} workers finished, average {:.2} ms",
        result.durations_ms.len(),
        result.mean_ms
    ))
    .with_metric(result.mean_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ProbeSettings;
    use crate::runner::test_support::simulated_context;
    use sysprobe_core::CapabilityState;

    #[test]
    fn arithmetic_reports_elapsed_time() {
        let mut cx = simulated_context(ProbeSettings::minimal());
        let outcome = stage_arithmetic(&mut cx).expect("arithmetic");
        assert!(outcome.detail.ends_with("ms"));
    }

    #[test]
    fn memory_reports_both_phases() {
        let mut cx = simulated_context(ProbeSettings::minimal());
        let outcome = stage_memory(&mut cx).expect("memory");
        assert!(outcome.detail.contains("allocated"));
        assert!(outcome.detail.contains("released"));
    }

    #[test]
    fn worker_compute_uses_background_thread_when_supported() {
        let mut cx = simulated_context(ProbeSettings::minimal());
        cx.registry.set(Capability::Workers, CapabilityState::Supported);
        let outcome = stage_worker_compute(&mut cx).expect("worker compute");
        assert!(!outcome.detail.contains("fallback"));
    }

    #[test]
    fn worker_stages_fall_back_without_workers() {
        let mut cx = simulated_context(ProbeSettings::minimal());
        cx.registry
            .set(Capability::Workers, CapabilityState::Unsupported);

        let single = stage_worker_compute(&mut cx).expect("worker compute");
        assert!(single.detail.contains("single-thread fallback"));

        let multi = stage_multicore(&mut cx).expect("multicore");
        assert!(multi.detail.contains("single-thread fallback"));
    }

    #[test]
    fn multicore_reports_worker_count() {
        let mut cx = simulated_context(ProbeSettings::minimal());
        cx.registry.set(Capability::Workers, CapabilityState::Supported);
        let outcome = stage_multicore(&mut cx).expect("multicore");
        assert!(outcome.detail.contains("workers finished"));
    }
}
