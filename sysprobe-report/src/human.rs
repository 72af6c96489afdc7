//! Human-Readable Output

use crate::sysinfo::HardwareInfo;
use crate::transcript::{LineKind, Transcript};

/// Format a transcript for terminal display, with a hardware-info header.
pub fn format_human_output(transcript: &Transcript, hardware: &HardwareInfo) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Sysprobe Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    output.push_str("Hardware Info\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Platform: {} ({})\n",
        hardware.platform, hardware.arch
    ));
    output.push_str(&format!("  CPU: {}\n", hardware.cpu));
    output.push_str(&format!("  Logical Cores: {}\n", hardware.logical_cores));
    if hardware.memory_gb > 0.0 {
        output.push_str(&format!("  Memory: {:.1} GB\n", hardware.memory_gb));
    } else {
        output.push_str("  Memory: Unknown\n");
    }
    output.push('\n');

    for line in transcript.lines() {
        match line.kind {
            LineKind::Header => {
                output.push_str(&format!("{}\n", line.text));
                output.push_str(&"-".repeat(60));
                output.push('\n');
            }
            LineKind::Primary => output.push_str(&format!("  {}\n", line.text)),
            LineKind::Supplemental => output.push_str(&format!("    {}\n", line.text)),
        }
    }

    output.push_str("\nSummary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Stages: {}  Lines: {}\n",
        transcript.primary_count(),
        transcript.len()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_hardware() -> HardwareInfo {
        HardwareInfo {
            platform: "linux".to_string(),
            arch: "x86_64".to_string(),
            cpu: "test cpu".to_string(),
            logical_cores: 4,
            memory_gb: 16.0,
        }
    }

    #[test]
    fn output_contains_hardware_and_lines() {
        let mut transcript = Transcript::new();
        transcript.begin("Benchmark started at 12:00:00");
        transcript.push_primary("Stage 1 - Node Tree Build: 10.00 ms");

        let output = format_human_output(&transcript, &dummy_hardware());

        assert!(output.contains("Sysprobe Results"));
        assert!(output.contains("Logical Cores: 4"));
        assert!(output.contains("Stage 1 - Node Tree Build: 10.00 ms"));
        assert!(output.contains("Stages: 1"));
    }

    #[test]
    fn unknown_memory_is_rendered_as_unknown() {
        let mut hardware = dummy_hardware();
        hardware.memory_gb = 0.0;
        let transcript = Transcript::new();

        let output = format_human_output(&transcript, &hardware);
        assert!(output.contains("Memory: Unknown"));
    }
}
