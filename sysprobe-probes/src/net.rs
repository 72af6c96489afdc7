//! Network Throughput Stage
//!
//! Times a ranged download of the first chunk of a configured URL and
//! derives megabits per second. The source sits behind a trait so tests
//! and offline runs can substitute a simulated download.

use crate::context::ProbeContext;
use crate::runner::StageOutcome;
use sysprobe_core::{ProbeError, Stopwatch};

/// Bytes fetched and the wall time the fetch took.
#[derive(Debug, Clone, Copy)]
pub struct ThroughputSample {
    /// Payload size in bytes.
    pub bytes: u64,
    /// Elapsed seconds.
    pub seconds: f64,
}

impl ThroughputSample {
    /// Payload size in megabytes.
    pub fn megabytes(&self) -> f64 {
        self.bytes as f64 / (1024.0 * 1024.0)
    }

    /// Derived throughput in megabits per second.
    pub fn mbps(&self) -> f64 {
        if self.seconds <= 0.0 {
            return 0.0;
        }
        self.megabytes() * 8.0 / self.seconds
    }
}

/// Source of a ranged download.
pub trait ThroughputSource {
    /// Fetch up to `range_bytes` bytes and report size and wall time.
    fn fetch(&self, range_bytes: u64) -> Result<ThroughputSample, ProbeError>;
}

/// HTTP source performing a real ranged GET.
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    /// Source downloading from `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ThroughputSource for HttpSource {
    fn fetch(&self, range_bytes: u64) -> Result<ThroughputSample, ProbeError> {
        let client = reqwest::blocking::Client::new();
        let range = format!("bytes=0-{}", range_bytes.saturating_sub(1));

        let watch = Stopwatch::start();
        let response = client
            .get(&self.url)
            .header(reqwest::header::RANGE, range)
            .send()
            .map_err(|e| ProbeError::stage(format!("network test failed: {e}")))?;
        let body = response
            .bytes()
            .map_err(|e| ProbeError::stage(format!("network test failed: {e}")))?;
        let seconds = watch.elapsed().as_secs_f64();

        Ok(ThroughputSample {
            bytes: body.len() as u64,
            seconds,
        })
    }
}

/// Fixed-result source for tests and offline runs.
pub struct SimulatedSource {
    sample: ThroughputSample,
}

impl SimulatedSource {
    /// Source that always reports the given sample.
    pub fn new(bytes: u64, seconds: f64) -> Self {
        Self {
            sample: ThroughputSample { bytes, seconds },
        }
    }
}

impl ThroughputSource for SimulatedSource {
    fn fetch(&self, _range_bytes: u64) -> Result<ThroughputSample, ProbeError> {
        Ok(self.sample)
    }
}

/// Throughput stage: ranged download via the context's source.
pub fn stage_network(cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let sample = cx.net.fetch(cx.settings.range_bytes)?;
    Ok(StageOutcome::new(format!(
        "downloaded {:.2} MB in {:.2} s (~{:.2} Mbps)",
        sample.megabytes(),
        sample.seconds,
        sample.mbps()
    ))
    .with_metric(sample.mbps()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_mib_in_one_second_is_eight_mbps() {
        let sample = ThroughputSample {
            bytes: 1_048_576,
            seconds: 1.0,
        };
        assert!((sample.mbps() - 8.0).abs() < 1e-9);
        assert!((sample.megabytes() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_reports_zero_throughput() {
        let sample = ThroughputSample {
            bytes: 1_048_576,
            seconds: 0.0,
        };
        assert_eq!(sample.mbps(), 0.0);
    }

    #[test]
    fn simulated_source_reports_its_fixture() {
        let source = SimulatedSource::new(2_097_152, 2.0);
        let sample = source.fetch(1_048_576).expect("fetch");
        assert_eq!(sample.bytes, 2_097_152);
        assert!((sample.mbps() - 8.0).abs() < 1e-9);
    }
}
