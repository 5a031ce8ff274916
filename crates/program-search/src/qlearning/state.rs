//! State discretization

use crate::candidate::Candidate;
use crate::structural::SourceFeatures;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucketed summary of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SearchState {
    /// `min(functions / 2, 4)`
    pub functions: u8,
    /// `min(containers, 3)`
    pub containers: u8,
    /// `min(non-blank lines / 10, 5)`
    pub length: u8,
    /// `min(fitness / 50, 5)`
    pub fitness: u8,
}

fn bucket(value: usize, width: usize, max: u8) -> u8 {
    (value / width).min(max as usize) as u8
}

impl SearchState {
    /// Bucket raw features and a fitness value
    pub fn from_features(features: SourceFeatures, fitness: f64) -> Self {
        // negative and NaN fitness land in bucket 0
        let fitness_bucket = if fitness.is_nan() || fitness <= 0.0 {
            0
        } else {
            (fitness / 50.0).floor().min(5.0) as u8
        };
        Self {
            functions: bucket(features.functions, 2, 4),
            containers: bucket(features.containers, 1, 3),
            length: bucket(features.lines, 10, 5),
            fitness: fitness_bucket,
        }
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.functions, self.containers, self.length, self.fitness
        )
    }
}

/// Discretize a candidate using its current source and fitness
pub fn discretize(candidate: &Candidate) -> SearchState {
    SearchState::from_features(SourceFeatures::of(candidate.source()), candidate.fitness())
}
