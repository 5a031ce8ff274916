//! CLI structure and argument parsing

use crate::commands::Commands;
use clap::Parser;
use std::path::PathBuf;

/// Search for high-scoring programs with genetic, annealing and Q-learning strategies
#[derive(Debug, Parser)]
#[command(name = "program-search")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Commands
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is unset
    pub fn default_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
