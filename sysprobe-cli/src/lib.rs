#![warn(missing_docs)]
//! Sysprobe CLI Library
//!
//! Argument parsing and the command entry points. The binary is a thin
//! wrapper over [`run`]; everything testable lives here.

mod config;

pub use config::*;

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use sysprobe_core::{Capability, WorkerPool};
use sysprobe_probes::{ProbeContext, Runner, stage_sequence};
use sysprobe_report::{
    OutputFormat, Transcript, collect_hardware_info, format_human_output, transcript_to_csv,
    transcript_to_json, write_artifacts,
};

/// Sysprobe CLI arguments
#[derive(Parser, Debug)]
#[command(name = "sysprobe")]
#[command(author, version, about = "sysprobe - host hardware and performance probes")]
pub struct Cli {
    /// Optional subcommand (list, run, init); defaults to run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format: human, json, csv (default: probe.toml or human)
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the JSON/CSV artifacts.
    /// Optionally specify a directory; defaults to config or target/sysprobe
    #[arg(long)]
    pub artifacts: Option<Option<PathBuf>>,

    /// Worker count for the multi-core stage (default: logical cores)
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// URL the network throughput stage downloads from
    #[arg(long)]
    pub url: Option<String>,

    /// Disable the terminal progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the stage sequence and probed capability states
    List,
    /// Run the full stage sequence (default)
    Run,
    /// Write a default probe.toml to the current directory
    Init,
}

/// Run the sysprobe CLI with arguments from the environment.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the sysprobe CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("sysprobe=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("sysprobe=info")
            .init();
    }

    // Discover probe.toml configuration (CLI flags override)
    let config = ProbeConfig::discover().unwrap_or_default();

    let format = resolve_format(cli.format.as_deref(), &config);

    match cli.command {
        Some(Commands::List) => list_stages(&config),
        Some(Commands::Init) => init_config(),
        Some(Commands::Run) | None => run_stages(&cli, &config, format),
    }
}

fn init_config() -> anyhow::Result<()> {
    let path = PathBuf::from("probe.toml");
    if path.exists() {
        return Err(anyhow::anyhow!("probe.toml already exists"));
    }
    std::fs::write(&path, ProbeConfig::default_toml())?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn list_stages(config: &ProbeConfig) -> anyhow::Result<()> {
    println!("Sysprobe Plan:");

    let settings = config.workloads.to_settings();
    let context = ProbeContext::from_host(settings, config.network.url.clone());
    let stages = stage_sequence();
    for (index, stage) in stages.iter().enumerate() {
        match stage.capability {
            Some(capability) => {
                let state = context.registry.state(capability);
                println!(
                    "├── {:2}. {} (needs {}: {:?})",
                    index + 1,
                    stage.name,
                    capability.name(),
                    state
                );
            }
            None => println!("├── {:2}. {}", index + 1, stage.name),
        }
    }
    println!("{} stages found.", stages.len());

    let states: Vec<String> = Capability::ALL
        .iter()
        .map(|&c| format!("{} ({:?})", c.name(), context.registry.state(c)))
        .collect();
    println!("Capabilities: {}", states.join(", "));

    Ok(())
}

/// Resolve the output format: the flag when passed, else probe.toml,
/// else human.
fn resolve_format(flag: Option<&str>, config: &ProbeConfig) -> OutputFormat {
    flag.unwrap_or(&config.output.format)
        .parse()
        .unwrap_or(OutputFormat::Human)
}

/// Build the host-wired probe context, layering probe.toml under CLI flags.
fn build_context(cli: &Cli, config: &ProbeConfig) -> ProbeContext {
    let settings = config.workloads.to_settings();
    let url = cli.url.clone().unwrap_or_else(|| config.network.url.clone());

    let mut context = ProbeContext::from_host(settings, url);
    if let Some(jobs) = cli.jobs {
        context.pool = WorkerPool::new(jobs);
    }
    context
}

fn run_stages(cli: &Cli, config: &ProbeConfig, format: OutputFormat) -> anyhow::Result<()> {
    let context = build_context(cli, config);
    let show_progress = !cli.no_progress && format == OutputFormat::Human && cli.output.is_none();

    let mut runner = Runner::new(context).with_progress(show_progress);
    let transcript = runner.run()?;

    let output = render(&transcript, format)?;
    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)?;
        file.write_all(output.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    // Artifacts: CLI --artifacts flag or output.save_artifacts in probe.toml
    let artifact_dir = match &cli.artifacts {
        Some(Some(dir)) => Some(dir.clone()),
        Some(None) => Some(PathBuf::from(&config.output.directory)),
        None if config.output.save_artifacts => Some(PathBuf::from(&config.output.directory)),
        None => None,
    };
    if let Some(dir) = artifact_dir {
        let (json_path, csv_path) = write_artifacts(&transcript, &dir)?;
        eprintln!(
            "Artifacts saved: {}, {}",
            json_path.display(),
            csv_path.display()
        );
    }

    Ok(())
}

fn render(transcript: &Transcript, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Human => {
            let hardware = collect_hardware_info();
            format_human_output(transcript, &hardware)
        }
        OutputFormat::Json => transcript_to_json(transcript)?,
        OutputFormat::Csv => transcript_to_csv(transcript),
    })
}
