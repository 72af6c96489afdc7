//! Stage Sequence and Runner
//!
//! The runner walks the fixed stage sequence strictly in order. Every
//! stage contributes exactly one primary transcript line: its result, its
//! failure, or the exact "not supported" text when a required capability
//! is missing. Failures and panics are captured at the stage boundary and
//! never abort the run; the only error `run` itself returns is the
//! second-invocation guard.

use crate::baseline::{baseline_entry, baseline_percent};
use crate::compute::{stage_arithmetic, stage_memory, stage_multicore, stage_worker_compute};
use crate::context::ProbeContext;
use crate::frames::{stage_dispatch_latency, stage_frame_rate};
use crate::gpu::stage_gpu_identification;
use crate::net::stage_network;
use crate::power::stage_battery;
use crate::raster::{stage_fill_rate, stage_raster_drawing, stage_surface_clears};
use crate::sensors::stage_sensors;
use crate::storage::stage_storage;
use crate::tree::stage_tree_build;
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::panic::{self, AssertUnwindSafe};
use sysprobe_core::{Capability, ProbeError, RunController};
use sysprobe_report::Transcript;

/// What a completed stage hands back to the runner.
#[derive(Debug, Clone)]
pub struct StageOutcome {
    /// Text after the colon in the primary line.
    pub detail: String,
    /// Numeric value for baseline comparison, when one exists.
    pub metric: Option<f64>,
    /// Supplemental lines appended after the primary line.
    pub extra: Vec<String>,
}

impl StageOutcome {
    /// Outcome with free-form detail text and no metric.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            metric: None,
            extra: Vec::new(),
        }
    }

    /// Outcome for a plain elapsed-time measurement.
    pub fn timed_ms(elapsed_ms: f64) -> Self {
        Self::new(format!("{:.2} ms", elapsed_ms)).with_metric(elapsed_ms)
    }

    /// Attach the comparable metric.
    pub fn with_metric(mut self, metric: f64) -> Self {
        self.metric = Some(metric);
        self
    }
}

/// One entry in the fixed stage sequence.
pub struct StageDef {
    /// Display name used in every line the stage produces.
    pub name: &'static str,
    /// Baseline table key, for stages with a reference measurement.
    pub baseline_key: Option<&'static str>,
    /// Capability the stage needs, checked before it runs.
    pub capability: Option<Capability>,
    /// Stage entry point.
    pub run: fn(&mut ProbeContext) -> Result<StageOutcome, ProbeError>,
}

/// The fixed stage sequence, in execution order.
pub fn stage_sequence() -> Vec<StageDef> {
    vec![
        StageDef {
            name: "Node Tree Build",
            baseline_key: Some("Tree"),
            capability: None,
            run: stage_tree_build,
        },
        StageDef {
            name: "Raster Drawing",
            baseline_key: Some("Raster"),
            capability: None,
            run: stage_raster_drawing,
        },
        StageDef {
            name: "Storage Round Trips",
            baseline_key: Some("Storage"),
            capability: None,
            run: stage_storage,
        },
        StageDef {
            name: "Arithmetic",
            baseline_key: Some("Math"),
            capability: None,
            run: stage_arithmetic,
        },
        StageDef {
            name: "Frame Rate",
            baseline_key: Some("FPS"),
            capability: None,
            run: stage_frame_rate,
        },
        StageDef {
            name: "Surface Clears",
            baseline_key: Some("Clears"),
            capability: Some(Capability::GpuSurface),
            run: stage_surface_clears,
        },
        StageDef {
            name: "Worker Compute",
            baseline_key: Some("Worker"),
            capability: None,
            run: stage_worker_compute,
        },
        StageDef {
            name: "Multi-Core Compute",
            baseline_key: None,
            capability: None,
            run: stage_multicore,
        },
        StageDef {
            name: "Network Throughput",
            baseline_key: None,
            capability: Some(Capability::Network),
            run: stage_network,
        },
        StageDef {
            name: "Battery",
            baseline_key: None,
            capability: Some(Capability::Battery),
            run: stage_battery,
        },
        StageDef {
            name: "GPU Identification",
            baseline_key: None,
            capability: Some(Capability::GpuInfo),
            run: stage_gpu_identification,
        },
        StageDef {
            name: "Memory Alloc/Release",
            baseline_key: None,
            capability: None,
            run: stage_memory,
        },
        StageDef {
            name: "Dispatch Latency",
            baseline_key: None,
            capability: None,
            run: stage_dispatch_latency,
        },
        StageDef {
            name: "Sensors",
            baseline_key: None,
            capability: Some(Capability::Sensors),
            run: stage_sensors,
        },
        StageDef {
            name: "Fill Rate",
            baseline_key: None,
            capability: None,
            run: stage_fill_rate,
        },
    ]
}

/// Single-shot stage runner.
///
/// `run` may be called once per runner; a second call returns
/// [`ProbeError::AlreadyRun`] without touching any stage.
pub struct Runner {
    controller: RunController,
    context: ProbeContext,
    progress: bool,
}

impl Runner {
    /// Runner over the given context, with no progress display.
    pub fn new(context: ProbeContext) -> Self {
        Self {
            controller: RunController::new(),
            context,
            progress: false,
        }
    }

    /// Enable or disable the terminal progress bar.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Whether this runner has already executed its sequence.
    pub fn has_run(&self) -> bool {
        self.controller.has_run()
    }

    /// Execute the full stage sequence and return the transcript.
    pub fn run(&mut self) -> Result<Transcript, ProbeError> {
        self.controller.begin()?;

        let stages = stage_sequence();
        let bar = self.progress_bar(stages.len());

        let mut transcript = Transcript::new();
        transcript.begin(format!(
            "Benchmark started at {}",
            Local::now().format("%H:%M:%S")
        ));
        tracing::info!(stages = stages.len(), "run started");

        let mut comparable: Vec<(&'static str, f64)> = Vec::new();

        for (index, stage) in stages.iter().enumerate() {
            let number = index + 1;
            bar.set_message(stage.name);

            if let Some(capability) = stage.capability {
                if !self.context.registry.state(capability).is_supported() {
                    tracing::debug!(stage = stage.name, "required capability unavailable");
                    transcript.push_primary(format!("{} not supported", stage.name));
                    bar.inc(1);
                    continue;
                }
            }

            let result = panic::catch_unwind(AssertUnwindSafe(|| (stage.run)(&mut self.context)));
            match result {
                Ok(Ok(outcome)) => {
                    tracing::debug!(stage = stage.name, detail = %outcome.detail, "stage complete");
                    transcript
                        .push_primary(format!("Stage {} - {}: {}", number, stage.name, outcome.detail));
                    for line in &outcome.extra {
                        transcript.push_supplemental(line.clone());
                    }
                    if let (Some(key), Some(metric)) = (stage.baseline_key, outcome.metric) {
                        comparable.push((key, metric));
                    }
                }
                Ok(Err(ProbeError::Unsupported(name))) => {
                    tracing::debug!(stage = stage.name, "stage reported itself unsupported");
                    transcript.push_primary(format!("{} not supported", name));
                }
                Ok(Err(err)) => {
                    tracing::warn!(stage = stage.name, error = %err, "stage failed");
                    transcript.push_primary(format!("Stage {} - {} failed: {}", number, stage.name, err));
                }
                Err(payload) => {
                    let message = panic_message(payload);
                    tracing::warn!(stage = stage.name, error = %message, "stage panicked");
                    transcript
                        .push_primary(format!("Stage {} - {} failed: {}", number, stage.name, message));
                }
            }
            bar.inc(1);
        }

        bar.finish_and_clear();

        // Ratio block comes after the whole sequence, in baseline order.
        for (key, metric) in comparable {
            if let Some(entry) = baseline_entry(key) {
                let pct = baseline_percent(entry, metric);
                transcript.push_supplemental(format!(
                    "↳ {} Performance: {:.0}% of baseline",
                    key, pct
                ));
            }
        }

        tracing::info!(lines = transcript.len(), "run finished");
        Ok(transcript)
    }

    fn progress_bar(&self, stages: usize) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(stages as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "stage panicked".to_string()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::context::{ProbeContext, ProbeSettings};
    use crate::frames::SimulatedFrameClock;
    use crate::net::SimulatedSource;
    use sysprobe_core::{Capability, CapabilityRegistry, CapabilityState, WorkerPool};

    /// Deterministic context: simulated 60 Hz clock, fixed 1 MiB / 1 s
    /// download, two workers, no platform reads.
    pub(crate) fn simulated_context(settings: ProbeSettings) -> ProbeContext {
        let mut registry = CapabilityRegistry::new();
        registry.set(Capability::Workers, CapabilityState::Supported);
        registry.set(Capability::GpuSurface, CapabilityState::Supported);
        registry.set(Capability::Network, CapabilityState::Supported);
        registry.set(Capability::Battery, CapabilityState::Unsupported);
        registry.set(Capability::GpuInfo, CapabilityState::Unsupported);
        registry.set(Capability::Sensors, CapabilityState::Unsupported);
        ProbeContext::with_parts(
            settings,
            registry,
            Box::new(SimulatedFrameClock::at_60hz()),
            Box::new(SimulatedSource::new(1_048_576, 1.0)),
            WorkerPool::new(2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::simulated_context;
    use super::*;
    use crate::context::ProbeSettings;

    fn simulated_runner() -> Runner {
        Runner::new(simulated_context(ProbeSettings::minimal()))
    }

    #[test]
    fn every_stage_contributes_one_primary_line() {
        let mut runner = simulated_runner();
        let transcript = runner.run().expect("run");
        assert_eq!(transcript.primary_count(), stage_sequence().len());
    }

    #[test]
    fn header_line_comes_first() {
        let mut runner = simulated_runner();
        let transcript = runner.run().expect("run");
        assert!(transcript.texts()[0].starts_with("Benchmark started at "));
    }

    #[test]
    fn unsupported_stages_render_the_exact_line() {
        let mut runner = simulated_runner();
        let transcript = runner.run().expect("run");
        let texts = transcript.texts();
        assert!(texts.contains(&"Battery not supported"));
        assert!(texts.contains(&"GPU Identification not supported"));
        assert!(texts.contains(&"Sensors not supported"));
    }

    #[test]
    fn second_run_is_rejected_with_no_lines() {
        let mut runner = simulated_runner();
        runner.run().expect("first run");
        assert!(runner.has_run());

        let err = runner.run().expect_err("second run must fail");
        assert!(matches!(err, ProbeError::AlreadyRun));
    }

    #[test]
    fn baseline_block_trails_the_stage_lines() {
        let mut runner = simulated_runner();
        let transcript = runner.run().expect("run");
        let texts = transcript.texts();

        let last_stage = texts
            .iter()
            .rposition(|t| t.contains("Fill Rate"))
            .expect("fill rate line");
        let tree_ratio = texts
            .iter()
            .position(|t| t.starts_with("↳ Tree Performance: "))
            .expect("tree ratio line");
        assert!(tree_ratio > last_stage);
        assert!(texts[tree_ratio].ends_with("% of baseline"));
        // All seven comparable metrics are present, in baseline order.
        let ratios: Vec<&&str> = texts.iter().filter(|t| t.contains("% of baseline")).collect();
        assert_eq!(ratios.len(), 7);
        assert!(ratios[4].starts_with("↳ FPS Performance: "));
    }

    #[test]
    fn simulated_frame_rate_line_reads_sixty() {
        let mut context = simulated_context(ProbeSettings::minimal());
        context.settings.sampling_window_ms = 1_000;
        let mut runner = Runner::new(context);
        let transcript = runner.run().expect("run");
        assert!(transcript
            .texts()
            .iter()
            .any(|t| t.contains("Frame Rate: 60.00")));
    }

    #[test]
    fn failing_stage_is_captured_not_propagated() {
        let stage = StageDef {
            name: "Broken",
            baseline_key: None,
            capability: None,
            run: |_| Err(ProbeError::stage("backing store vanished")),
        };
        let mut context = simulated_context(ProbeSettings::minimal());
        let result = panic::catch_unwind(AssertUnwindSafe(|| (stage.run)(&mut context)));
        let err = result.expect("no panic").expect_err("stage error");
        assert_eq!(err.to_string(), "backing store vanished");
    }

    #[test]
    fn panicking_stage_yields_a_failure_line() {
        fn exploding(_: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
            panic!("index out of range");
        }
        let mut context = simulated_context(ProbeSettings::minimal());
        let result = panic::catch_unwind(AssertUnwindSafe(|| exploding(&mut context)));
        let message = panic_message(result.expect_err("must panic"));
        assert_eq!(message, "index out of range");
    }

    #[test]
    fn sequence_has_fifteen_stages_in_fixed_order() {
        let stages = stage_sequence();
        assert_eq!(stages.len(), 15);
        assert_eq!(stages[0].name, "Node Tree Build");
        assert_eq!(stages[4].name, "Frame Rate");
        assert_eq!(stages[14].name, "Fill Rate");
    }
}
