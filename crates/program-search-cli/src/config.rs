//! Configuration management for the program-search CLI

use crate::{CliError, Result};
use program_search::improvement::CommandImproverConfig;
use program_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Interpreter used to execute candidates
    pub interpreter: String,

    /// Per-run execution timeout in milliseconds
    pub timeout_ms: u64,

    /// Directory holding saved artifacts
    pub artifact_dir: PathBuf,

    /// Seed used when a command does not pass `--seed`
    pub seed: Option<u64>,

    /// External improvement command used by `--enhance`
    pub improver: Option<CommandImproverConfig>,
}

impl CliConfig {
    /// Load configuration from `path`, or from the default location when
    /// no path is given. A missing default file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::config_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Get the default config path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("program-search").join("config.toml"))
    }

    /// Library configuration carrying the interpreter, timeout and
    /// improvement settings of this file
    pub fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::default();
        config.executor.interpreter = self.interpreter.clone();
        config.executor.timeout_ms = self.timeout_ms;
        config.improver = self.improver.clone();
        config
    }
}

fn default_artifact_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("program-search").join("artifacts"))
        .unwrap_or_else(|| PathBuf::from(".program-search").join("artifacts"))
}

impl Default for CliConfig {
    fn default() -> Self {
        let executor = SearchConfig::default().executor;
        Self {
            interpreter: executor.interpreter,
            timeout_ms: executor.timeout_ms,
            artifact_dir: default_artifact_dir(),
            seed: None,
            improver: None,
        }
    }
}
