//! Stage Timing
//!
//! Probe stages measure elapsed wall-clock time around a single workload
//! pass. `Stopwatch` wraps `std::time::Instant` and reports fractional
//! milliseconds, which is the unit every transcript line uses.

use std::time::{Duration, Instant};

/// Wall-clock stopwatch for a single stage measurement.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    /// Start timing now.
    #[inline]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time since the stopwatch started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed time in fractional milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Pin the current thread to a specific core.
///
/// Fan-out workers pin themselves so each one exercises a distinct core
/// instead of piling onto whichever core the scheduler favors.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> Result<(), std::io::Error> {
    use std::mem::MaybeUninit;

    unsafe {
        let mut set = MaybeUninit::<libc::cpu_set_t>::zeroed();
        let set_ref = set.assume_init_mut();

        libc::CPU_ZERO(set_ref);
        libc::CPU_SET(cpu % libc::CPU_SETSIZE as usize, set_ref);

        let result = libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), set_ref);

        if result == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

/// CPU pinning is unavailable on this platform.
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopwatch_measures_sleep() {
        let watch = Stopwatch::start();
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = watch.elapsed();

        assert!(elapsed >= Duration::from_millis(5));
        assert!(elapsed < Duration::from_millis(500));
    }

    #[test]
    fn elapsed_ms_matches_duration() {
        let watch = Stopwatch::start();
        std::thread::sleep(Duration::from_millis(10));
        let ms = watch.elapsed_ms();

        assert!(ms >= 5.0);
        assert!(ms < 500.0);
    }
}
