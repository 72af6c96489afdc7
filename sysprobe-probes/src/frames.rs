//! Frame-Rate Sampling and Dispatch Latency
//!
//! The frame clock abstracts a repeating per-frame callback. Sampling
//! counts ticks until a fixed wall-clock window elapses and derives a
//! rate; dispatch latency times an event from posting to its observation
//! on the next frame tick. A simulated clock with a fixed interval keeps
//! both measurable in tests.

use crate::context::ProbeContext;
use crate::runner::StageOutcome;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use sysprobe_core::{ProbeError, Stopwatch};

/// Repeating frame tick source.
pub trait FrameClock {
    /// Reset the clock's sampling origin.
    fn restart(&mut self);

    /// Block until the next frame tick; returns elapsed time since the
    /// last `restart`.
    fn next_frame(&mut self) -> Duration;
}

/// Host frame clock ticking at a fixed interval.
#[derive(Debug)]
pub struct SystemFrameClock {
    interval: Duration,
    origin: Instant,
}

impl SystemFrameClock {
    /// Clock with an explicit tick interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            origin: Instant::now(),
        }
    }

    /// Clock approximating a 60 Hz display.
    pub fn at_60hz() -> Self {
        Self::new(Duration::from_nanos(16_666_667))
    }
}

impl FrameClock for SystemFrameClock {
    fn restart(&mut self) {
        self.origin = Instant::now();
    }

    fn next_frame(&mut self) -> Duration {
        thread::sleep(self.interval);
        self.origin.elapsed()
    }
}

/// Deterministic clock advancing a virtual elapsed time per tick.
#[derive(Debug)]
pub struct SimulatedFrameClock {
    interval: Duration,
    elapsed: Duration,
}

impl SimulatedFrameClock {
    /// Simulated clock with a fixed per-frame interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Simulated 60 Hz clock (exact 1/60 s frames).
    pub fn at_60hz() -> Self {
        Self::new(Duration::from_secs(1) / 60)
    }
}

impl FrameClock for SimulatedFrameClock {
    fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn next_frame(&mut self) -> Duration {
        self.elapsed += self.interval;
        self.elapsed
    }
}

/// Count frame ticks until `window` elapses and derive frames per second.
pub fn sample_frame_rate(clock: &mut dyn FrameClock, window: Duration) -> f64 {
    clock.restart();
    let mut frames: u64 = 0;
    let elapsed = loop {
        let elapsed = clock.next_frame();
        frames += 1;
        if elapsed >= window {
            break elapsed;
        }
    };
    frames as f64 / elapsed.as_secs_f64()
}

/// Frame-rate stage: sample over the configured window.
pub fn stage_frame_rate(cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let window = Duration::from_millis(cx.settings.sampling_window_ms);
    let fps = sample_frame_rate(cx.clock.as_mut(), window);
    Ok(StageOutcome::new(format!("{:.2}", fps)).with_metric(fps))
}

/// Dispatch-latency stage: post an event through a background dispatcher,
/// then time until the next frame tick observes it.
pub fn stage_dispatch_latency(cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let (tx, rx) = mpsc::channel::<()>();

    let watch = Stopwatch::start();
    thread::Builder::new()
        .name("sysprobe-dispatch".to_string())
        .spawn(move || {
            let _ = tx.send(());
        })
        .map_err(|e| ProbeError::stage(format!("failed to spawn dispatcher: {e}")))?;

    rx.recv()
        .map_err(|_| ProbeError::stage("dispatcher exited without posting"))?;

    // The event is only "seen" on the following frame tick.
    cx.clock.restart();
    cx.clock.next_frame();
    let latency = watch.elapsed_ms();

    Ok(StageOutcome::timed_ms(latency))
}
