//! Hybrid pipeline implementation

use super::config::HybridConfig;
use super::performance::PhaseReport;
use crate::annealing::Annealer;
use crate::candidate::Candidate;
use crate::error::SearchResult;
use crate::genetic::GeneticEngine;
use crate::metrics::SearchMetrics;
use crate::qlearning::QLearner;
use crate::toolkit::SearchToolkit;
use crate::traits::{EngineConfig, SearchOutcome, SearchStrategy};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Winners of every phase plus per-phase reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridOutcome {
    /// Genetic phase winner
    pub ga_best: Candidate,
    /// Annealing phase winner
    pub sa_best: Candidate,
    /// Q-learning phase winner, the pipeline result
    pub best: Candidate,
    /// Genetic, annealing and Q-learning reports, in order
    pub phases: Vec<PhaseReport>,
    /// Full metrics of each phase, in order
    pub metrics: Vec<SearchMetrics>,
}

impl HybridOutcome {
    /// Fitness change from the genetic winner to the annealing winner
    pub fn annealing_delta(&self) -> f64 {
        self.sa_best.fitness() - self.ga_best.fitness()
    }

    /// Fitness change from the annealing winner to the final result
    pub fn learning_delta(&self) -> f64 {
        self.best.fitness() - self.sa_best.fitness()
    }

    /// Fitness change across the whole pipeline
    pub fn total_delta(&self) -> f64 {
        self.best.fitness() - self.ga_best.fitness()
    }
}

/// Runs genetic search, then annealing seeded with its winner, then
/// Q-learning restarting every episode from the annealing winner
#[derive(Debug)]
pub struct HybridOrchestrator {
    config: HybridConfig,
    genetic: GeneticEngine,
    annealer: Annealer,
    learner: QLearner,
}

impl HybridOrchestrator {
    /// Create new pipeline; every phase config is validated up front
    pub fn new(config: HybridConfig, toolkit: SearchToolkit) -> SearchResult<Self> {
        config.validate()?;
        let (evolution, annealing, learning) = config.phase_configs();
        Ok(Self {
            genetic: GeneticEngine::new(evolution, toolkit.clone())?,
            annealer: Annealer::new(annealing, toolkit.clone())?,
            learner: QLearner::new(learning, toolkit)?,
            config,
        })
    }

    /// Pipeline configuration
    pub fn config(&self) -> &HybridConfig {
        &self.config
    }

    /// Run all three phases. A seed joins the genetic phase's initial
    /// population.
    pub fn orchestrate(&mut self, seed: Option<Candidate>) -> HybridOutcome {
        info!("Hybrid phase 1: genetic search");
        let genetic = self.genetic.run(seed);
        let ga_best = genetic.best.clone();

        info!(
            "Hybrid phase 2: annealing from fitness {:.2}",
            ga_best.fitness()
        );
        let annealing = self.annealer.run(Some(ga_best.clone()));
        let sa_best = annealing.best.clone();

        info!(
            "Hybrid phase 3: Q-learning from fitness {:.2}",
            sa_best.fitness()
        );
        let learning = self.learner.run(Some(sa_best.clone()));

        let outcome = HybridOutcome {
            ga_best,
            sa_best,
            best: learning.best,
            phases: [&genetic.metrics, &annealing.metrics, &learning.metrics]
                .into_iter()
                .map(PhaseReport::from_metrics)
                .collect(),
            metrics: vec![genetic.metrics, annealing.metrics, learning.metrics],
        };

        info!(
            "Hybrid finished: GA {:.2} -> SA {:.2} ({:+.2}) -> QL {:.2} ({:+.2})",
            outcome.ga_best.fitness(),
            outcome.sa_best.fitness(),
            outcome.annealing_delta(),
            outcome.best.fitness(),
            outcome.learning_delta()
        );
        outcome
    }
}

impl SearchStrategy for HybridOrchestrator {
    fn name(&self) -> &str {
        self.config.engine_name()
    }

    fn run(&mut self, seed: Option<Candidate>) -> SearchOutcome {
        let outcome = self.orchestrate(seed);
        let mut metrics = SearchMetrics::new(self.config.engine_name());
        metrics.initial_fitness = outcome.ga_best.fitness();
        metrics.best_fitness = outcome.best.fitness();
        for phase in &outcome.metrics {
            metrics.iterations += phase.iterations;
            metrics.total_evaluations += phase.total_evaluations;
            metrics.elapsed_time += phase.elapsed_time;
            metrics
                .history
                .best_fitness_history
                .extend_from_slice(&phase.history.best_fitness_history);
        }
        SearchOutcome {
            best: outcome.best,
            metrics,
        }
    }
}
