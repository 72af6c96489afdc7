//! Run-Once State
//!
//! The probing suite runs at most once per session. The guard is explicit
//! state owned by whoever drives the run, not a module-global flag.

use crate::ProbeError;

/// Explicit run-once controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunController {
    has_run: bool,
}

impl RunController {
    /// Fresh controller that has not run yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the run as started. Fails if a run already happened.
    pub fn begin(&mut self) -> Result<(), ProbeError> {
        if self.has_run {
            return Err(ProbeError::AlreadyRun);
        }
        self.has_run = true;
        Ok(())
    }

    /// Whether a run has been started on this controller.
    pub fn has_run(&self) -> bool {
        self.has_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_begin_succeeds() {
        let mut controller = RunController::new();
        assert!(!controller.has_run());
        assert!(controller.begin().is_ok());
        assert!(controller.has_run());
    }

    #[test]
    fn second_begin_is_refused() {
        let mut controller = RunController::new();
        controller.begin().expect("first run");

        match controller.begin() {
            Err(ProbeError::AlreadyRun) => {}
            other => panic!("expected AlreadyRun, got {:?}", other.map(|_| ())),
        }
    }
}
