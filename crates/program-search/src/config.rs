//! Configuration for a complete search setup

use crate::annealing::AnnealingConfig;
use crate::error::SearchResult;
use crate::fitness::{ExecutorConfig, FitnessConfig};
use crate::generator::GeneratorConfig;
use crate::genetic::EvolutionConfig;
use crate::hybrid::HybridConfig;
use crate::improvement::{CommandImprover, CommandImproverConfig};
use crate::qlearning::QLearningConfig;
use crate::toolkit::SearchToolkit;
use crate::traits::EngineConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Collaborator and strategy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Scoring constants
    pub fitness: FitnessConfig,
    /// Execution sandbox
    pub executor: ExecutorConfig,
    /// Program generator shape
    pub generator: GeneratorConfig,
    /// External improvement command, if any
    pub improver: Option<CommandImproverConfig>,
    /// Genetic engine
    pub evolution: EvolutionConfig,
    /// Annealer
    pub annealing: AnnealingConfig,
    /// Q-learner
    pub learning: QLearningConfig,
    /// Hybrid pipeline
    pub hybrid: HybridConfig,
}

impl SearchConfig {
    /// Validate every section
    pub fn validate(&self) -> SearchResult<()> {
        self.fitness.validate()?;
        self.generator.validate()?;
        self.evolution.validate()?;
        self.annealing.validate()?;
        self.learning.validate()?;
        self.hybrid.validate()?;
        if let Some(improver) = &self.improver {
            CommandImprover::new(improver.clone())?;
        }
        Ok(())
    }

    /// Interpreter-backed toolkit, with the improvement command when set
    pub fn toolkit(&self) -> SearchResult<SearchToolkit> {
        let toolkit = SearchToolkit::python(
            self.fitness.clone(),
            self.executor.clone(),
            self.generator.clone(),
        )?;
        match &self.improver {
            Some(improver) => {
                let improver = CommandImprover::new(improver.clone())?;
                Ok(toolkit.with_improver(Arc::new(improver)))
            }
            None => Ok(toolkit),
        }
    }

    /// Create a builder for the configuration
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }
}

/// Builder for SearchConfig
#[derive(Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Seed every strategy
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.evolution.seed = Some(seed);
        self.config.annealing.seed = Some(seed);
        self.config.learning.seed = Some(seed);
        self.config.hybrid.seed = Some(seed);
        self
    }

    /// Enable/disable result enhancement for every strategy
    pub fn enhance(mut self, enabled: bool) -> Self {
        self.config.evolution.enhance_result = enabled;
        self.config.annealing.enhance_result = enabled;
        self.config.learning.enhance_result = enabled;
        self.config.hybrid.enhance_results = enabled;
        self
    }

    /// Set interpreter binary
    pub fn interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.config.executor.interpreter = interpreter.into();
        self
    }

    /// Set per-run execution timeout
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.executor.timeout_ms = timeout_ms;
        self
    }

    /// Set the improvement command
    pub fn improver(mut self, improver: CommandImproverConfig) -> Self {
        self.config.improver = Some(improver);
        self
    }

    /// Set genetic engine configuration
    pub fn evolution(mut self, evolution: EvolutionConfig) -> Self {
        self.config.evolution = evolution;
        self
    }

    /// Set annealer configuration
    pub fn annealing(mut self, annealing: AnnealingConfig) -> Self {
        self.config.annealing = annealing;
        self
    }

    /// Set Q-learner configuration
    pub fn learning(mut self, learning: QLearningConfig) -> Self {
        self.config.learning = learning;
        self
    }

    /// Set hybrid pipeline configuration
    pub fn hybrid(mut self, hybrid: HybridConfig) -> Self {
        self.config.hybrid = hybrid;
        self
    }

    /// Build the configuration
    pub fn build(self) -> SearchResult<SearchConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
