//! Configuration for the Q-learner

use crate::error::{SearchError, SearchResult};
use crate::traits::EngineConfig;
use serde::{Deserialize, Serialize};

/// Q-learner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QLearningConfig {
    /// Episodes `E`
    pub episodes: usize,
    /// Maximum steps per episode `S`
    pub max_steps: usize,
    /// Learning rate `α`
    pub learning_rate: f64,
    /// Discount `γ`
    pub discount: f64,
    /// Exploration rate of the first episode
    pub epsilon_start: f64,
    /// Exploration rate of the last episode
    pub epsilon_end: f64,
    /// Mutation probability of the generic-mutate action
    pub mutation_rate: f64,
    /// Run the improvement oracle over the final best
    pub enhance_result: bool,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            episodes: 50,
            max_steps: 20,
            learning_rate: 0.1,
            discount: 0.9,
            epsilon_start: 1.0,
            epsilon_end: 0.1,
            mutation_rate: 1.0,
            enhance_result: false,
            seed: None,
        }
    }
}

impl QLearningConfig {
    /// Exploration rate of `episode`, decaying linearly over the run
    pub fn epsilon(&self, episode: usize) -> f64 {
        let span = self.episodes.saturating_sub(1).max(1) as f64;
        let progress = (episode as f64 / span).min(1.0);
        self.epsilon_start + (self.epsilon_end - self.epsilon_start) * progress
    }
}

impl EngineConfig for QLearningConfig {
    fn validate(&self) -> SearchResult<()> {
        if self.episodes == 0 {
            return Err(SearchError::InvalidConfiguration {
                message: "Episodes must be greater than 0".to_string(),
            });
        }

        if self.max_steps == 0 {
            return Err(SearchError::InvalidConfiguration {
                message: "Steps per episode must be greater than 0".to_string(),
            });
        }

        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 || self.learning_rate > 1.0 {
            return Err(SearchError::InvalidConfiguration {
                message: "Learning rate must be in (0, 1]".to_string(),
            });
        }

        for (name, value) in [
            ("Discount", self.discount),
            ("Initial epsilon", self.epsilon_start),
            ("Final epsilon", self.epsilon_end),
            ("Mutation rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SearchError::InvalidConfiguration {
                    message: format!("{} must be between 0 and 1", name),
                });
            }
        }

        Ok(())
    }

    fn engine_name(&self) -> &str {
        "q-learning"
    }
}
