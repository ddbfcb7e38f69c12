//! Rasterflow CLI - Command-line interface for the rasterflow image graph.

mod chain;
mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rasterflow")]
#[command(author, version, about = "Rasterflow image graph CLI", long_about = None)]
struct Cli {
    /// Config file (TOML). Defaults to the user config directory.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an image through a chain of operators
    Process(commands::process::ProcessArgs),

    /// Print the blur kernel for given settings
    Kernel(commands::kernel::KernelArgs),

    /// List available operators, their ports and parameters
    Operators(commands::operators::OperatorsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::Config::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(log_level = %config.log_level, "config loaded");

    match cli.command {
        Commands::Process(args) => commands::process::run(args, &config),
        Commands::Kernel(args) => commands::kernel::run(args),
        Commands::Operators(args) => commands::operators::run(args),
    }
}
