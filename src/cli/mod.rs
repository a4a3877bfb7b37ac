pub mod commands;

use clap::{Parser, Subcommand};

use crate::runner::{DEFAULT_RUN_DEADLINE_SECS, DEFAULT_WORKERS};

#[derive(Parser)]
#[command(name = "driftwatch")]
#[command(about = "Watches configured web sources and reports content changes", long_about = None)]
pub struct Cli {
    /// Path to the sources file
    #[arg(short, long, default_value = "sources.toml", global = true)]
    pub config: std::path::PathBuf,

    /// Path to the state database (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub db: Option<std::path::PathBuf>,

    /// Number of sources checked concurrently
    #[arg(short, long, default_value_t = DEFAULT_WORKERS, global = true)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check every source once and send the digest
    Run {
        /// Print the digest to stdout instead of notifying
        #[arg(long)]
        dry_run: bool,

        /// Whole-run deadline in seconds
        #[arg(long, default_value_t = DEFAULT_RUN_DEADLINE_SECS)]
        deadline: u64,
    },
    /// Parse and validate the sources file without fetching anything
    Validate,
    /// List the configured sources
    List,
}
