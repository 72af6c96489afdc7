//! End-to-end runs over a fully simulated context: deterministic frame
//! clock, fixed download sample, pinned capability states, tiny workloads.

use sysprobe::{
    Capability, CapabilityRegistry, CapabilityState, OutputFormat, ProbeContext, ProbeError,
    ProbeSettings, Runner, SimulatedFrameClock, SimulatedSource, WorkerPool, fan_in_mean,
    stage_sequence, transcript_to_csv, transcript_to_json, write_artifacts,
};

fn simulated_registry() -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();
    registry.set(Capability::Workers, CapabilityState::Supported);
    registry.set(Capability::GpuSurface, CapabilityState::Supported);
    registry.set(Capability::Network, CapabilityState::Supported);
    registry.set(Capability::Battery, CapabilityState::Unsupported);
    registry.set(Capability::GpuInfo, CapabilityState::Unsupported);
    registry.set(Capability::Sensors, CapabilityState::Unsupported);
    registry
}

fn simulated_context(registry: CapabilityRegistry) -> ProbeContext {
    ProbeContext::with_parts(
        ProbeSettings::minimal(),
        registry,
        Box::new(SimulatedFrameClock::at_60hz()),
        Box::new(SimulatedSource::new(1_048_576, 1.0)),
        WorkerPool::new(2),
    )
}

#[test]
fn full_run_yields_one_primary_line_per_stage() {
    let mut runner = Runner::new(simulated_context(simulated_registry()));
    let transcript = runner.run().expect("run");

    assert_eq!(transcript.primary_count(), stage_sequence().len());
    assert!(transcript.texts()[0].starts_with("Benchmark started at "));
    assert!(transcript.started_at().is_some());
}

#[test]
fn second_run_on_the_same_runner_is_rejected() {
    let mut runner = Runner::new(simulated_context(simulated_registry()));
    runner.run().expect("first run");

    let err = runner.run().expect_err("second run");
    assert!(matches!(err, ProbeError::AlreadyRun));

    // A fresh runner over a fresh context runs fine.
    let mut fresh = Runner::new(simulated_context(simulated_registry()));
    assert!(fresh.run().is_ok());
}

#[test]
fn unsupported_capabilities_render_exact_lines() {
    let mut registry = simulated_registry();
    registry.set(Capability::GpuSurface, CapabilityState::Unsupported);

    let mut runner = Runner::new(simulated_context(registry));
    let transcript = runner.run().expect("run");
    let texts = transcript.texts();

    assert!(texts.contains(&"Surface Clears not supported"));
    assert!(texts.contains(&"Battery not supported"));
    // The run continues past the skipped stage.
    assert!(texts.iter().any(|t| t.contains("Fill Rate")));
    assert_eq!(transcript.primary_count(), stage_sequence().len());
}

#[test]
fn unknown_capability_is_treated_as_unsupported_at_the_stage_boundary() {
    let mut registry = simulated_registry();
    registry.set(Capability::Network, CapabilityState::Unknown);

    let mut runner = Runner::new(simulated_context(registry));
    let transcript = runner.run().expect("run");
    assert!(transcript
        .texts()
        .contains(&"Network Throughput not supported"));
}

#[test]
fn simulated_frame_clock_reports_sixty_fps() {
    let mut context = simulated_context(simulated_registry());
    context.settings.sampling_window_ms = 1_000;

    let mut runner = Runner::new(context);
    let transcript = runner.run().expect("run");
    assert!(transcript
        .texts()
        .iter()
        .any(|t| t.contains("Frame Rate: 60.00")));
}

#[test]
fn fan_in_mean_matches_hand_computed_value() {
    let mean = fan_in_mean(&[100.0, 120.0, 110.0, 130.0]);
    assert_eq!(format!("{:.2} ms", mean), "115.00 ms");
}

#[test]
fn multicore_stage_reports_its_worker_count() {
    let mut runner = Runner::new(simulated_context(simulated_registry()));
    let transcript = runner.run().expect("run");
    assert!(transcript
        .texts()
        .iter()
        .any(|t| t.contains("2 workers finished, average ")));
}

#[test]
fn network_stage_derives_throughput_from_the_sample() {
    let mut runner = Runner::new(simulated_context(simulated_registry()));
    let transcript = runner.run().expect("run");
    // 1 MiB in 1 s is 8 Mbps.
    assert!(transcript
        .texts()
        .iter()
        .any(|t| t.contains("downloaded 1.00 MB in 1.00 s (~8.00 Mbps)")));
}

#[test]
fn baseline_lines_are_supplemental_and_well_formed() {
    let mut runner = Runner::new(simulated_context(simulated_registry()));
    let transcript = runner.run().expect("run");
    let texts = transcript.texts();

    for key in ["Tree", "Raster", "Storage", "Math", "FPS", "Clears", "Worker"] {
        let prefix = format!("↳ {} Performance: ", key);
        let line = texts
            .iter()
            .find(|t| t.starts_with(&prefix))
            .unwrap_or_else(|| panic!("missing baseline line for {}", key));
        assert!(line.ends_with("% of baseline"));
    }
}

#[test]
fn exports_round_trip_through_json_and_csv() {
    let mut runner = Runner::new(simulated_context(simulated_registry()));
    let transcript = runner.run().expect("run");

    let json = transcript_to_json(&transcript).expect("json");
    let parsed: Vec<String> = serde_json::from_str(&json).expect("parse");
    assert_eq!(parsed.len(), transcript.len());

    let csv = transcript_to_csv(&transcript);
    assert_eq!(csv.lines().count(), transcript.len());
    assert!(!csv.contains('↳'));
    assert!(!csv.contains("Performance: "));
    assert!(csv.contains("% of baseline"));
}

#[test]
fn artifacts_are_written_into_the_target_directory() {
    let mut runner = Runner::new(simulated_context(simulated_registry()));
    let transcript = runner.run().expect("run");

    let dir = tempfile::tempdir().expect("tempdir");
    let (json_path, csv_path) = write_artifacts(&transcript, dir.path()).expect("artifacts");
    assert!(json_path.exists());
    assert!(csv_path.exists());
}

#[test]
fn output_format_parsing_accepts_the_documented_names() {
    assert_eq!("human".parse::<OutputFormat>(), Ok(OutputFormat::Human));
    assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
    assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
    assert!("html".parse::<OutputFormat>().is_err());
}
