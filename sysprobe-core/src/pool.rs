//! Worker Fan-Out / Fan-In
//!
//! The multi-core stage dispatches N identical tasks (N = logical core
//! count) and joins on all N reports before aggregating. Workers time
//! their own workload locally and report a single duration; the batch is
//! complete when the Nth report arrives, and the aggregate is the mean of
//! the individual durations.

use crate::measure::{Stopwatch, pin_to_cpu};
use crate::task::TaskSpec;
use crate::ProbeError;
use std::sync::mpsc;
use std::thread;

/// Aggregate of one completed fan-out batch.
#[derive(Debug, Clone)]
pub struct FanInResult {
    /// Per-worker durations in milliseconds, in report order.
    pub durations_ms: Vec<f64>,
    /// Mean of the individual durations.
    pub mean_ms: f64,
}

/// Mean of individual worker durations in milliseconds.
pub fn fan_in_mean(durations_ms: &[f64]) -> f64 {
    if durations_ms.is_empty() {
        return 0.0;
    }
    durations_ms.iter().sum::<f64>() / durations_ms.len() as f64
}

/// Fixed-size pool that fans a task out to identical workers.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Pool with an explicit worker count (clamped to at least 1).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Pool sized to the host's logical core count, or `fallback` when the
    /// count cannot be determined.
    pub fn from_host(fallback: usize) -> Self {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(fallback);
        Self::new(workers)
    }

    /// Number of workers this pool dispatches per batch.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Dispatch `workers` copies of the task and wait for every one of
    /// them to report exactly once.
    pub fn fan_out(&self, task: &TaskSpec) -> Result<FanInResult, ProbeError> {
        let (tx, rx) = mpsc::channel::<f64>();
        let mut handles = Vec::with_capacity(self.workers);

        for index in 0..self.workers {
            let tx = tx.clone();
            let workload = task.workload;
            let handle = thread::Builder::new()
                .name(format!("{}-v{}-{}", task.name, task.version, index))
                .spawn(move || {
                    let _ = pin_to_cpu(index);
                    let watch = Stopwatch::start();
                    std::hint::black_box(workload.execute());
                    let _ = tx.send(watch.elapsed_ms());
                })
                .map_err(|e| ProbeError::stage(format!("failed to spawn worker: {e}")))?;
            handles.push(handle);
        }
        drop(tx);

        // Fan-in join: the receiver drains until every sender is gone.
        let mut durations_ms = Vec::with_capacity(self.workers);
        for duration in rx {
            durations_ms.push(duration);
        }
        for handle in handles {
            let _ = handle.join();
        }

        if durations_ms.len() != self.workers {
            return Err(ProbeError::stage(format!(
                "expected {} worker reports, got {}",
                self.workers,
                durations_ms.len()
            )));
        }

        let mean_ms = fan_in_mean(&durations_ms);
        tracing::debug!(
            task = task.name,
            workers = self.workers,
            mean_ms,
            "fan-out batch complete"
        );
        Ok(FanInResult { durations_ms, mean_ms })
    }

    /// Run the same workload once on the calling thread. Used when the
    /// worker capability is unavailable.
    pub fn run_single_threaded(task: &TaskSpec) -> FanInResult {
        let watch = Stopwatch::start();
        std::hint::black_box(task.workload.execute());
        let elapsed = watch.elapsed_ms();
        FanInResult {
            durations_ms: vec![elapsed],
            mean_ms: elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Workload;

    #[test]
    fn mean_of_known_durations() {
        let mean = fan_in_mean(&[100.0, 120.0, 110.0, 130.0]);
        assert!((mean - 115.0).abs() < f64::EPSILON);
        assert_eq!(format!("{:.2} ms", mean), "115.00 ms");
    }

    #[test]
    fn mean_of_empty_batch_is_zero() {
        assert_eq!(fan_in_mean(&[]), 0.0);
    }

    #[test]
    fn fan_out_waits_for_every_worker() {
        let pool = WorkerPool::new(4);
        let task = TaskSpec::new("test-load", 1, Workload::SumSqrt { iterations: 50_000 });

        let result = pool.fan_out(&task).expect("fan-out");

        assert_eq!(result.durations_ms.len(), 4);
        assert!(result.durations_ms.iter().all(|&d| d >= 0.0));
        assert!((result.mean_ms - fan_in_mean(&result.durations_ms)).abs() < f64::EPSILON);
    }

    #[test]
    fn pool_clamps_to_one_worker() {
        assert_eq!(WorkerPool::new(0).workers(), 1);
    }

    #[test]
    fn single_threaded_fallback_reports_one_duration() {
        let task = TaskSpec::new("fallback", 1, Workload::SumSequence { iterations: 10_000 });
        let result = WorkerPool::run_single_threaded(&task);
        assert_eq!(result.durations_ms.len(), 1);
        assert_eq!(result.mean_ms, result.durations_ms[0]);
    }
}
