//! JSON and CSV Artifacts
//!
//! The JSON artifact is the transcript rendered as an array of line
//! strings. The CSV artifact is the same lines with two fixed decorative
//! prefixes stripped, so downstream tooling sees plain values.

use crate::transcript::Transcript;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Decorative fragments removed from CSV lines.
const CSV_STRIPPED: [&str; 2] = ["↳ ", "Performance: "];

/// File name of the JSON artifact.
pub const JSON_ARTIFACT: &str = "benchmark_results.json";

/// File name of the CSV artifact.
pub const CSV_ARTIFACT: &str = "benchmark_results.csv";

/// Render the transcript as a prettified JSON array of line strings.
pub fn transcript_to_json(transcript: &Transcript) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&transcript.texts())
}

/// Render the transcript as CSV lines with decorative prefixes stripped.
pub fn transcript_to_csv(transcript: &Transcript) -> String {
    transcript
        .lines()
        .iter()
        .map(|line| {
            let mut text = line.text.clone();
            for fragment in CSV_STRIPPED {
                text = text.replace(fragment, "");
            }
            text
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write both artifacts into `dir`, creating it if needed. Returns the
/// paths of the JSON and CSV files.
pub fn write_artifacts(
    transcript: &Transcript,
    dir: impl AsRef<Path>,
) -> std::io::Result<(PathBuf, PathBuf)> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let json = transcript_to_json(transcript)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let json_path = dir.join(JSON_ARTIFACT);
    let mut file = std::fs::File::create(&json_path)?;
    file.write_all(json.as_bytes())?;

    let csv_path = dir.join(CSV_ARTIFACT);
    let mut file = std::fs::File::create(&csv_path)?;
    file.write_all(transcript_to_csv(transcript).as_bytes())?;

    Ok((json_path, csv_path))
}
