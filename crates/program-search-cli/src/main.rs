//! program-search - multi-strategy program optimizer CLI

use clap::Parser;
use program_search_cli::{config::CliConfig, Cli, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging on stderr so reports on stdout stay clean
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::load(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Some(cmd) => cmd.execute(&config).await,
        None => {
            // No command specified, start the interactive menu
            program_search_cli::shell::run_shell(&config).await
        }
    }
}
