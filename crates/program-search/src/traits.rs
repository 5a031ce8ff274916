//! Core trait definitions for search strategies

use crate::candidate::Candidate;
use crate::error::SearchResult;
use crate::metrics::SearchMetrics;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Configuration trait for search engines
pub trait EngineConfig: Debug + Send + Sync {
    /// Validate the configuration
    fn validate(&self) -> SearchResult<()>;

    /// Get the engine name
    fn engine_name(&self) -> &str;
}

/// Best candidate of a run plus how it was found
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Best candidate, evaluated
    pub best: Candidate,
    /// Run metrics
    pub metrics: SearchMetrics,
}

/// A strategy that searches for a high-scoring candidate.
///
/// `run` never fails: configuration problems are rejected when the engine
/// is built, and every collaborator failure during the run degrades to a
/// fallback value.
pub trait SearchStrategy {
    /// Strategy name used in logs and metrics
    fn name(&self) -> &str;

    /// Search, optionally warm-started from `seed`
    fn run(&mut self, seed: Option<Candidate>) -> SearchOutcome;
}

/// Engine random source: reproducible when `seed` is set
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
