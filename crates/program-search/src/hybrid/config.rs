//! Configuration types for the hybrid pipeline

use crate::annealing::AnnealingConfig;
use crate::error::SearchResult;
use crate::genetic::EvolutionConfig;
use crate::qlearning::QLearningConfig;
use crate::traits::EngineConfig;
use serde::{Deserialize, Serialize};

/// Hybrid pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridConfig {
    /// Phase 1
    pub evolution: EvolutionConfig,
    /// Phase 2
    pub annealing: AnnealingConfig,
    /// Phase 3
    pub learning: QLearningConfig,
    /// Run the improvement oracle over every phase's best
    pub enhance_results: bool,
    /// Pipeline seed; phase seeds are derived from it when set
    pub seed: Option<u64>,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            evolution: EvolutionConfig {
                population_size: 10,
                generations: 5,
                ..EvolutionConfig::default()
            },
            annealing: AnnealingConfig::default(),
            learning: QLearningConfig {
                episodes: 30,
                max_steps: 15,
                epsilon_start: 0.5,
                ..QLearningConfig::default()
            },
            enhance_results: false,
            seed: None,
        }
    }
}

impl HybridConfig {
    /// Phase configs with the pipeline seed and enhancement flag applied
    pub fn phase_configs(&self) -> (EvolutionConfig, AnnealingConfig, QLearningConfig) {
        let mut evolution = self.evolution.clone();
        let mut annealing = self.annealing.clone();
        let mut learning = self.learning.clone();

        if let Some(seed) = self.seed {
            evolution.seed = Some(seed);
            annealing.seed = Some(seed.wrapping_add(1));
            learning.seed = Some(seed.wrapping_add(2));
        }
        if self.enhance_results {
            evolution.enhance_result = true;
            annealing.enhance_result = true;
            learning.enhance_result = true;
        }
        (evolution, annealing, learning)
    }
}

impl EngineConfig for HybridConfig {
    fn validate(&self) -> SearchResult<()> {
        self.evolution.validate()?;
        self.annealing.validate()?;
        self.learning.validate()?;
        Ok(())
    }

    fn engine_name(&self) -> &str {
        "hybrid"
    }
}
