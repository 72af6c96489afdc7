#![warn(missing_docs)]
//! Sysprobe Report - Transcript and Output
//!
//! Holds the run transcript (ordered result lines) and renders it:
//! - Human-readable terminal output with a hardware-info header
//! - JSON artifact (array of the line strings)
//! - CSV artifact (decorative prefixes stripped)

mod export;
mod human;
mod sysinfo;
mod transcript;

pub use export::{
    CSV_ARTIFACT, JSON_ARTIFACT, transcript_to_csv, transcript_to_json, write_artifacts,
};
pub use human::format_human_output;
pub use sysinfo::{HardwareInfo, collect_hardware_info};
pub use transcript::{LineKind, ResultLine, Transcript};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output.
    Human,
    /// JSON array of result lines.
    Json,
    /// CSV with decorative prefixes stripped.
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!("human".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
