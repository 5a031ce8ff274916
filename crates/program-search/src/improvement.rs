//! Optional post-search improvement of a result's source
//!
//! The search never depends on an improver succeeding: any failure leaves
//! the source untouched.

use crate::error::{SearchError, SearchResult};
use crate::process::run_with_timeout;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::process::Command;

/// Rewrites candidate source, e.g. through an external assistant
pub trait CodeImprover: Send + Sync {
    /// Return an improved version of `source`
    fn improve(&self, source: &str) -> SearchResult<String>;
}

/// Improver that returns its input
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityImprover;

impl CodeImprover for IdentityImprover {
    fn improve(&self, source: &str) -> SearchResult<String> {
        Ok(source.to_string())
    }
}

/// External command configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandImproverConfig {
    /// Program to run
    pub program: String,
    /// Arguments
    #[serde(default)]
    pub args: Vec<String>,
    /// Wall-clock limit in milliseconds
    #[serde(default = "default_improver_timeout")]
    pub timeout_ms: u64,
}

fn default_improver_timeout() -> u64 {
    30_000
}

/// Pipes the source through an external command and takes its stdout
#[derive(Debug, Clone)]
pub struct CommandImprover {
    config: CommandImproverConfig,
}

impl CommandImprover {
    /// Create new command improver
    pub fn new(config: CommandImproverConfig) -> SearchResult<Self> {
        if config.program.trim().is_empty() {
            return Err(SearchError::invalid_config(
                "Improvement command must not be empty",
            ));
        }
        Ok(Self { config })
    }
}

impl CodeImprover for CommandImprover {
    fn improve(&self, source: &str) -> SearchResult<String> {
        let output = run_with_timeout(
            Command::new(&self.config.program).args(&self.config.args),
            Some(source.to_string()),
            Duration::from_millis(self.config.timeout_ms),
        )
        .map_err(|e| SearchError::Improvement {
            reason: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(SearchError::Improvement {
                reason: format!(
                    "{} exited with {}: {}",
                    self.config.program,
                    output.status,
                    output.stderr.trim()
                ),
            });
        }
        if output.stdout.trim().is_empty() {
            return Err(SearchError::Improvement {
                reason: format!("{} produced no output", self.config.program),
            });
        }
        Ok(output.stdout)
    }
}

/// Improve `source`, falling back to it unchanged on any failure
pub fn improve_or_original(improver: &dyn CodeImprover, source: &str) -> String {
    match improver.improve(source) {
        Ok(improved) => improved,
        Err(e) => {
            tracing::warn!("Improvement unavailable, keeping original source: {}", e);
            source.to_string()
        }
    }
}
