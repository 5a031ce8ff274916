//! Candidate programs under optimization

use crate::fitness::FitnessOracle;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scored source-text artifact.
///
/// The fitness is only meaningful while the source is unchanged since the
/// last evaluation. Every constructor that produces new source yields an
/// unevaluated candidate, so stale scores cannot leak into comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique identifier
    pub id: Uuid,
    source: String,
    fitness: Option<f64>,
}

impl Candidate {
    /// Create an unevaluated candidate owning `source`
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            fitness: None,
        }
    }

    /// Create a candidate with a known score (test fixtures, restored artifacts)
    pub fn with_fitness(source: impl Into<String>, fitness: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            fitness: Some(fitness),
        }
    }

    /// Source text
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Last computed score, `0.0` until evaluated
    #[inline]
    pub fn fitness(&self) -> f64 {
        self.fitness.unwrap_or(0.0)
    }

    /// Whether the stored fitness reflects the current source
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Derive a child owning `source`.
    ///
    /// Returns an exact copy (fitness kept) when the text is unchanged.
    pub fn derive(&self, source: String) -> Self {
        if source == self.source {
            return self.clone();
        }
        Self::new(source)
    }

    /// Score with `oracle` if the fitness is stale. Returns true when the
    /// oracle was actually consulted.
    pub fn evaluate(&mut self, oracle: &dyn FitnessOracle) -> bool {
        if self.fitness.is_some() {
            return false;
        }
        self.fitness = Some(oracle.score(&self.source).max(0.0));
        true
    }
}
