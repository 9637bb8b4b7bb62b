//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::check::{self, SourceArgs};
use super::output::{Output, OutputFormat};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "grid-square-checker")]
#[command(
    author,
    version,
    about = "Checks that the grid squares in the database are where they should be"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, env = "GRID_CHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable coloured text output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge the reference and the export, then report problems
    Check(SourceArgs),

    /// Merge the reference and the export, then print the merged model as JSON
    Dump(SourceArgs),

    /// Report problems in a model previously printed by `dump`
    Evaluate {
        /// Path to the model JSON
        model: PathBuf,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(config.default_format);
    let output = Output::new(format, cli.verbose).with_color(config.color && !cli.no_color);

    output.verbose("grid-square-checker starting");
    if let Some(path) = &cli.config {
        output.verbose_ctx("config", &format!("Loaded config from: {}", path.display()));
    }

    match cli.command {
        Commands::Check(sources) => check::check(&output, &config, &sources)?,
        Commands::Dump(sources) => check::dump(&output, &config, &sources)?,
        Commands::Evaluate { model } => check::evaluate(&output, &model)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
