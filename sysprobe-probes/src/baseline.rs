//! Baseline Comparison
//!
//! Fixed reference values for the timed stages, used to append the
//! supplemental "percent of baseline" lines after a run. Time metrics
//! score higher when lower; the frame rate scores higher when higher.

/// Reference value for one comparable stage metric.
#[derive(Debug, Clone, Copy)]
pub struct BaselineEntry {
    /// Short label shown in the supplemental line.
    pub key: &'static str,
    /// Reference measurement (milliseconds, or frames per second for FPS).
    pub reference: f64,
    /// Whether a larger measured value beats the reference.
    pub higher_is_better: bool,
}

/// Reference measurements for the comparable stages, in stage order.
pub const BASELINE: [BaselineEntry; 7] = [
    BaselineEntry {
        key: "Tree",
        reference: 100.0,
        higher_is_better: false,
    },
    BaselineEntry {
        key: "Raster",
        reference: 50.0,
        higher_is_better: false,
    },
    BaselineEntry {
        key: "Storage",
        reference: 30.0,
        higher_is_better: false,
    },
    BaselineEntry {
        key: "Math",
        reference: 150.0,
        higher_is_better: false,
    },
    BaselineEntry {
        key: "FPS",
        reference: 60.0,
        higher_is_better: true,
    },
    BaselineEntry {
        key: "Clears",
        reference: 40.0,
        higher_is_better: false,
    },
    BaselineEntry {
        key: "Worker",
        reference: 80.0,
        higher_is_better: false,
    },
];

/// Look up a baseline entry by key.
pub fn baseline_entry(key: &str) -> Option<&'static BaselineEntry> {
    BASELINE.iter().find(|entry| entry.key == key)
}

/// Score a measurement against its baseline, as a percentage.
///
/// 100 means on par with the reference; above 100 means faster.
pub fn baseline_percent(entry: &BaselineEntry, measured: f64) -> f64 {
    if entry.higher_is_better {
        if entry.reference <= 0.0 {
            return 0.0;
        }
        measured / entry.reference * 100.0
    } else {
        if measured <= 0.0 {
            return 0.0;
        }
        entry.reference / measured * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_the_reference_scores_one_hundred() {
        for entry in &BASELINE {
            let pct = baseline_percent(entry, entry.reference);
            assert_eq!(format!("{:.0}", pct), "100", "key {}", entry.key);
        }
    }

    #[test]
    fn halving_a_time_doubles_the_score() {
        let entry = baseline_entry("Tree").expect("Tree baseline");
        assert_eq!(baseline_percent(entry, 50.0), 200.0);
    }

    #[test]
    fn frame_rate_scores_with_the_measurement() {
        let entry = baseline_entry("FPS").expect("FPS baseline");
        assert_eq!(baseline_percent(entry, 30.0), 50.0);
        assert_eq!(baseline_percent(entry, 120.0), 200.0);
    }

    #[test]
    fn zero_measurements_score_zero_instead_of_dividing() {
        let entry = baseline_entry("Storage").expect("Storage baseline");
        assert_eq!(baseline_percent(entry, 0.0), 0.0);
    }
}
