//! LogixUML CLI - Command-line interface for LogixUML
//!
//! Usage:
//!   logixuml aoi [dir]              - Merge AOI exports into the unit test project
//!   logixuml patterns [dir]         - Dry-run pattern instantiation and annotation
//!   logixuml scan-mode <name>...    - Show the scan mode derived from names

use clap::{Parser, Subcommand};
use cli::commands::{AoiCommand, PatternsCommand, ScanModeCommand};
use cli::Settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logixuml")]
#[command(about = "LogixUML - AOI merge and state machine pattern tooling")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge AOI definitions into a project
    Aoi(AoiCommand),
    /// Instantiate patterns and annotate state machines
    Patterns(PatternsCommand),
    /// Derive scan modes from state machine names
    ScanMode(ScanModeCommand),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref(), cli.json)?;
    tracing::debug!("Configuration: {:?}", settings.config);

    match cli.command {
        Commands::Aoi(cmd) => cmd.run(&settings),
        Commands::Patterns(cmd) => cmd.run(&settings),
        Commands::ScanMode(cmd) => cmd.run(&settings),
    }
}
