//! Sensor Presence Stage
//!
//! Enumerates the platform's industrial-IO sensor devices and reports
//! each by name. Presence only; nothing is sampled.

use crate::context::ProbeContext;
use crate::runner::StageOutcome;
use sysprobe_core::ProbeError;

#[cfg(target_os = "linux")]
fn sensor_names() -> Result<Vec<String>, ProbeError> {
    let entries = std::fs::read_dir("/sys/bus/iio/devices")
        .map_err(|e| ProbeError::stage(format!("failed to read sensor devices: {e}")))?;

    let mut names = Vec::new();
    for entry in entries.flatten() {
        let name_path = entry.path().join("name");
        match std::fs::read_to_string(&name_path) {
            Ok(name) => names.push(name.trim().to_string()),
            // Trigger entries carry no name file.
            Err(_) => continue,
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(not(target_os = "linux"))]
fn sensor_names() -> Result<Vec<String>, ProbeError> {
    Err(ProbeError::Unsupported("Sensors".to_string()))
}

/// Sensor stage: count devices and list each one on its own line.
pub fn stage_sensors(_cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let names = sensor_names()?;
    if names.is_empty() {
        return Err(ProbeError::Unsupported("Sensors".to_string()));
    }

    let mut outcome = StageOutcome::new(format!("{} sensor(s) detected", names.len()));
    for name in &names {
        outcome.extra.push(format!("↳ {} present", name));
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ProbeSettings;
    use crate::runner::test_support::simulated_context;

    #[test]
    fn stage_errs_or_lists_sensors() {
        let mut cx = simulated_context(ProbeSettings::minimal());
        match stage_sensors(&mut cx) {
            Ok(outcome) => {
                assert!(outcome.detail.contains("sensor(s) detected"));
                assert!(!outcome.extra.is_empty());
            }
            Err(err) => {
                let msg = err.to_string();
                assert!(msg.contains("Sensors") || msg.contains("sensor"));
            }
        }
    }
}
