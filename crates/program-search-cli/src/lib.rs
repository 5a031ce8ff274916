//! program-search CLI library

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod shell;

pub use cli::Cli;
pub use commands::Commands;
pub use error::{CliError, Result};
