//! Battery Stage
//!
//! Reads charging state and level from the platform power-supply
//! interface. The stage is capability-gated; on hosts without a battery
//! the runner reports it as unsupported before this code runs.

use crate::context::ProbeContext;
use crate::runner::StageOutcome;
use sysprobe_core::ProbeError;

/// Snapshot of the first battery the platform exposes.
#[derive(Debug, Clone, PartialEq)]
pub struct BatterySnapshot {
    /// Whether the battery is charging.
    pub charging: bool,
    /// Charge level in percent.
    pub level_percent: f64,
}

impl BatterySnapshot {
    fn describe(&self) -> String {
        format!(
            "charging: {}, level: {:.1}%",
            if self.charging { "Yes" } else { "No" },
            self.level_percent
        )
    }
}

#[cfg(target_os = "linux")]
fn read_battery() -> Result<BatterySnapshot, ProbeError> {
    let entries = std::fs::read_dir("/sys/class/power_supply")
        .map_err(|e| ProbeError::stage(format!("failed to read power supplies: {e}")))?;

    for entry in entries.flatten() {
        if !entry.file_name().to_string_lossy().starts_with("BAT") {
            continue;
        }
        let path = entry.path();
        let status = std::fs::read_to_string(path.join("status"))
            .map_err(|e| ProbeError::stage(format!("failed to read battery status: {e}")))?;
        let capacity = std::fs::read_to_string(path.join("capacity"))
            .map_err(|e| ProbeError::stage(format!("failed to read battery capacity: {e}")))?;

        let level_percent = capacity
            .trim()
            .parse::<f64>()
            .map_err(|e| ProbeError::stage(format!("unparseable battery capacity: {e}")))?;

        return Ok(BatterySnapshot {
            charging: status.trim() == "Charging",
            level_percent,
        });
    }

    Err(ProbeError::Unsupported("Battery".to_string()))
}

#[cfg(not(target_os = "linux"))]
fn read_battery() -> Result<BatterySnapshot, ProbeError> {
    Err(ProbeError::Unsupported("Battery".to_string()))
}

/// Battery stage: report charging state and level.
pub fn stage_battery(_cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let snapshot = read_battery()?;
    Ok(StageOutcome::new(snapshot.describe()).with_metric(snapshot.level_percent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_describes_charging_state() {
        let snapshot = BatterySnapshot {
            charging: true,
            level_percent: 87.5,
        };
        assert_eq!(snapshot.describe(), "charging: Yes, level: 87.5%");

        let snapshot = BatterySnapshot {
            charging: false,
            level_percent: 12.0,
        };
        assert_eq!(snapshot.describe(), "charging: No, level: 12.0%");
    }
}
