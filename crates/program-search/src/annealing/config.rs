//! Configuration for the annealer

use crate::error::{SearchError, SearchResult};
use crate::traits::EngineConfig;
use serde::{Deserialize, Serialize};

/// Annealer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealingConfig {
    /// Starting temperature `T0`
    pub initial_temperature: f64,
    /// Multiplicative cooling factor `r`
    pub cooling_rate: f64,
    /// Loop runs while the temperature stays above this
    pub min_temperature: f64,
    /// Probability of mutating the current candidate each step
    pub mutation_rate: f64,
    /// Run the improvement oracle over the final best
    pub enhance_result: bool,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling_rate: 0.95,
            min_temperature: 1.0,
            mutation_rate: 0.3,
            enhance_result: false,
            seed: None,
        }
    }
}

impl AnnealingConfig {
    /// Number of temperature steps a run performs
    pub fn steps(&self) -> usize {
        let mut steps = 0;
        let mut temperature = self.initial_temperature;
        while temperature > self.min_temperature {
            steps += 1;
            temperature *= self.cooling_rate;
        }
        steps
    }
}

impl EngineConfig for AnnealingConfig {
    fn validate(&self) -> SearchResult<()> {
        if !self.min_temperature.is_finite() || self.min_temperature <= 0.0 {
            return Err(SearchError::InvalidConfiguration {
                message: "Minimum temperature must be a positive number".to_string(),
            });
        }

        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(SearchError::InvalidConfiguration {
                message: "Initial temperature must be a positive number".to_string(),
            });
        }

        if self.cooling_rate.is_nan() || self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0 {
            return Err(SearchError::InvalidConfiguration {
                message: "Cooling rate must be strictly between 0 and 1".to_string(),
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
        "annealing"
    }
}
