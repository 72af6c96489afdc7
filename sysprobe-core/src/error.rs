//! Probe Error Types

use thiserror::Error;

/// Errors surfaced by the probe runtime.
///
/// Stage-level failures never escape the run boundary: the runner captures
/// them into the transcript and continues. `AlreadyRun` is the one error a
/// caller sees from `run()` itself.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The runner was invoked a second time in the same session.
    #[error("benchmarks already run; create a new runner to run again")]
    AlreadyRun,

    /// A required host capability is missing.
    #[error("{0} not supported")]
    Unsupported(String),

    /// A stage operation failed.
    #[error("{0}")]
    Stage(String),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProbeError {
    /// Build a stage failure from any displayable cause.
    pub fn stage(message: impl std::fmt::Display) -> Self {
        ProbeError::Stage(message.to_string())
    }
}
