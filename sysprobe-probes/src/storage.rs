//! Storage Read/Write Stage
//!
//! A scratch directory holds one small file per key; the stage times N
//! write+read-back round trips and verifies the payload on the way out.

use crate::context::ProbeContext;
use crate::runner::StageOutcome;
use std::path::PathBuf;
use sysprobe_core::{ProbeError, Stopwatch};
use tempfile::TempDir;

/// Scratch key/value store backed by a temporary directory.
pub struct ScratchStore {
    dir: TempDir,
}

impl ScratchStore {
    /// Create a fresh scratch directory.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::Builder::new().prefix("sysprobe-storage").tempdir()?,
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.path().join(key)
    }

    /// Write a value under a key.
    pub fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        std::fs::write(self.key_path(key), value)
    }

    /// Read a key's value back.
    pub fn get(&self, key: &str) -> std::io::Result<String> {
        std::fs::read_to_string(self.key_path(key))
    }
}

/// Time N write+read round trips against a fresh scratch store.
pub fn stage_storage(cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let store = ScratchStore::new()?;
    let round_trips = cx.settings.storage_round_trips;

    let watch = Stopwatch::start();
    for i in 0..round_trips {
        let key = format!("key{}", i);
        let value = format!("value{}", i);
        store.set(&key, &value)?;
        let read_back = store.get(&key)?;
        if read_back != value {
            return Err(ProbeError::stage(format!(
                "storage round trip {} returned corrupted data",
                i
            )));
        }
    }
    Ok(StageOutcome::timed_ms(watch.elapsed_ms()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ProbeSettings;
    use crate::runner::test_support::simulated_context;

    #[test]
    fn set_then_get_round_trips() {
        let store = ScratchStore::new().expect("scratch dir");
        store.set("key0", "value0").expect("set");
        assert_eq!(store.get("key0").expect("get"), "value0");
    }

    #[test]
    fn missing_key_is_an_error() {
        let store = ScratchStore::new().expect("scratch dir");
        assert!(store.get("absent").is_err());
    }

    #[test]
    fn stage_completes_with_metric() {
        let mut cx = simulated_context(ProbeSettings::minimal());
        let outcome = stage_storage(&mut cx).expect("storage stage");
        assert!(outcome.metric.is_some());
    }
}
