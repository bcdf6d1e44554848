//! CLI command definitions.

pub mod alter;
pub mod create;
pub mod describe;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Alter table schemas held by a metadata authority.
#[derive(Debug, Parser)]
#[command(name = "tablealter")]
#[command(version, about = "Alter table schemas", long_about = None)]
pub struct Cli {
    /// Path to the JSON descriptor store.
    #[arg(long, env = "TABLEALTER_STORE")]
    pub store: Option<PathBuf>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a table.
    Create(create::CreateCommand),
    /// Show a table's descriptor.
    Describe(describe::DescribeCommand),
    /// Alter a table's descriptor.
    Alter(alter::AlterCommand),
}
