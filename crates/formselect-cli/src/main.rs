//! formselect CLI - check select manifests and replay scripted input.

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use formselect_cli::logging::{init_logging, LogConfig, LogFormat};
use formselect_cli::replay::{parse_script, replay};
use formselect_yaml::SelectManifest;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "formselect")]
#[command(about = "Dropdown select control: manifest checks and input replay")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value = "compact", global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a manifest
    Check {
        /// Manifest file (.yaml, .yml or .toml)
        manifest: PathBuf,
    },

    /// Replay a step script against a control built from a manifest
    Replay {
        /// Manifest file (.yaml, .yml or .toml)
        manifest: PathBuf,

        /// YAML list of steps
        script: PathBuf,

        /// Report format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_ansi(io::stderr().is_terminal());
    init_logging(&log_config)?;

    match cli.command {
        Commands::Check { manifest } => check(&manifest),
        Commands::Replay {
            manifest,
            script,
            format,
        } => run_replay(&manifest, &script, format),
    }
}

fn load_manifest(path: &Path) -> anyhow::Result<SelectManifest> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    let manifest = if is_toml {
        SelectManifest::from_toml(&source)
    } else {
        SelectManifest::from_yaml(&source)
    };
    manifest.with_context(|| format!("invalid manifest {}", path.display()))
}

fn check(path: &Path) -> anyhow::Result<()> {
    let manifest = load_manifest(path)?;
    let enabled = manifest.options.iter().filter(|o| !o.disabled).count();
    tracing::info!(path = %path.display(), "manifest ok");
    println!(
        "{}: ok ({} options, {} enabled, selected: {})",
        path.display(),
        manifest.options.len(),
        enabled,
        manifest.selected.as_deref().unwrap_or("-")
    );
    Ok(())
}

fn run_replay(manifest: &Path, script: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let manifest = load_manifest(manifest)?;
    let source = fs::read_to_string(script)
        .with_context(|| format!("failed to read {}", script.display()))?;
    let steps = parse_script(&source)?;
    tracing::info!(steps = steps.len(), "replaying");

    let report = replay(&manifest, &steps);
    match format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
