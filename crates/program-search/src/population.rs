//! Population management for the genetic engine

use crate::candidate::Candidate;
use crate::fitness::FitnessOracle;
use rand::seq::index;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Ordered, fixed-capacity set of candidates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Population {
    /// Candidates, sorted descending by fitness after [`Population::sort_by_fitness`]
    pub candidates: Vec<Candidate>,
    /// Current generation
    pub generation: u64,
}

impl Population {
    /// Create new empty population
    pub fn new() -> Self {
        Self::default()
    }

    /// Create population from candidates
    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            generation: 0,
        }
    }

    /// Add candidate to population
    pub fn add(&mut self, candidate: Candidate) {
        self.candidates.push(candidate);
    }

    /// Get population size
    #[inline]
    pub fn size(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the population is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Score every unevaluated candidate; returns the number of oracle calls
    pub fn evaluate(&mut self, oracle: &dyn FitnessOracle) -> usize {
        let mut calls = 0;
        for candidate in &mut self.candidates {
            if candidate.evaluate(oracle) {
                calls += 1;
            }
        }
        calls
    }

    /// Stable sort, highest fitness first
    pub fn sort_by_fitness(&mut self) {
        self.candidates.sort_by(|a, b| compare_fitness(b, a));
    }

    /// Highest-fitness candidate; the earliest one on ties
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates
            .iter()
            .reduce(|best, c| if c.fitness() > best.fitness() { c } else { best })
    }

    /// Copies of the first `n` candidates (call after sorting)
    pub fn elites(&self, n: usize) -> Vec<Candidate> {
        self.candidates.iter().take(n).cloned().collect()
    }

    /// Mean fitness, `0.0` for an empty population
    pub fn average_fitness(&self) -> f64 {
        if self.candidates.is_empty() {
            return 0.0;
        }
        self.candidates.iter().map(Candidate::fitness).sum::<f64>() / self.candidates.len() as f64
    }

    /// Indices of `k` candidates drawn uniformly without replacement, in
    /// draw order. `k` is capped at the population size.
    pub fn tournament_sample(&self, k: usize, rng: &mut dyn RngCore) -> Vec<usize> {
        let amount = k.min(self.candidates.len());
        index::sample(&mut *rng, self.candidates.len(), amount).into_vec()
    }

    /// Tournament selection: the fittest of `k` uniformly sampled members.
    ///
    /// Ties go to the earliest drawn, which is itself uniformly random.
    pub fn tournament_select(&self, k: usize, rng: &mut dyn RngCore) -> Option<&Candidate> {
        self.tournament_sample(k.max(1), rng)
            .into_iter()
            .map(|i| &self.candidates[i])
            .reduce(|winner, c| if c.fitness() > winner.fitness() { c } else { winner })
    }
}

fn compare_fitness(a: &Candidate, b: &Candidate) -> Ordering {
    a.fitness().total_cmp(&b.fitness())
}
