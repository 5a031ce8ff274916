//! Configuration for the genetic engine

use crate::error::{SearchError, SearchResult};
use crate::structural::RecombineLimits;
use crate::traits::EngineConfig;
use serde::{Deserialize, Serialize};

/// Genetic engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Population size `N`
    pub population_size: usize,
    /// Generations `G`; the last one is evaluated but not bred
    pub generations: u32,
    /// Members sampled per tournament
    pub tournament_size: usize,
    /// Top candidates copied unchanged into the next generation
    pub elite_count: usize,
    /// Probability of mutating a crossover child
    pub mutation_rate: f64,
    /// Crossover caps and short-child threshold
    pub recombine: RecombineLimits,
    /// Run the improvement oracle over the final best
    pub enhance_result: bool,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            generations: 5,
            tournament_size: 3,
            elite_count: 2,
            mutation_rate: 0.2,
            recombine: RecombineLimits::default(),
            enhance_result: false,
            seed: None,
        }
    }
}

impl EngineConfig for EvolutionConfig {
    fn validate(&self) -> SearchResult<()> {
        if self.population_size == 0 {
            return Err(SearchError::InvalidConfiguration {
                message: "Population size must be greater than 0".to_string(),
            });
        }

        if self.generations == 0 {
            return Err(SearchError::InvalidConfiguration {
                message: "Generations must be greater than 0".to_string(),
            });
        }

        if self.tournament_size == 0 {
            return Err(SearchError::InvalidConfiguration {
                message: "Tournament size must be greater than 0".to_string(),
            });
        }

        if self.elite_count > self.population_size {
            return Err(SearchError::InvalidConfiguration {
                message: "Elite count must not exceed population size".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SearchError::InvalidConfiguration {
                message: "Mutation rate must be between 0 and 1".to_string(),
            });
        }

        Ok(())
    }

    fn engine_name(&self) -> &str {
        "genetic"
    }
}
