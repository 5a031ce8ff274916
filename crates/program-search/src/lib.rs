//! Multi-strategy search for high-scoring programs
//!
//! This crate provides three interchangeable strategies over candidate
//! source text and a pipeline chaining them:
//! - Genetic: tournament selection, unit crossover, elitism
//! - Annealing: single-trajectory Metropolis search
//! - Q-learning: tabular policy over discretized program states
//! - Hybrid: genetic, then annealing, then Q-learning

#![warn(missing_docs)]

pub mod annealing;
pub mod candidate;
pub mod config;
pub mod error;
pub mod fitness;
pub mod generator;
pub mod genetic;
pub mod hybrid;
pub mod improvement;
pub mod metrics;
pub mod mutation;
pub mod population;
pub mod qlearning;
pub mod store;
pub mod structural;
pub mod toolkit;
pub mod traits;

mod process;

#[cfg(test)]
mod test_helpers;

pub use annealing::{AnnealingConfig, Annealer};
pub use candidate::Candidate;
pub use config::SearchConfig;
pub use error::{SearchError, SearchResult};
pub use fitness::{FitnessConfig, FitnessOracle, ProgramFitness};
pub use genetic::{EvolutionConfig, GeneticEngine};
pub use hybrid::{HybridConfig, HybridOrchestrator, HybridOutcome};
pub use metrics::SearchMetrics;
pub use qlearning::{QLearner, QLearningConfig};
pub use store::{ArtifactSelector, ArtifactStore, FileArtifactStore};
pub use toolkit::SearchToolkit;
pub use traits::{EngineConfig, SearchOutcome, SearchStrategy};

/// Run the genetic engine. Fails only on an invalid configuration.
pub fn run_evolution(
    config: EvolutionConfig,
    toolkit: SearchToolkit,
    seed: Option<Candidate>,
) -> SearchResult<SearchOutcome> {
    Ok(GeneticEngine::new(config, toolkit)?.run(seed))
}

/// Run the annealer. Fails only on an invalid configuration.
pub fn run_annealing(
    config: AnnealingConfig,
    toolkit: SearchToolkit,
    seed: Option<Candidate>,
) -> SearchResult<SearchOutcome> {
    Ok(Annealer::new(config, toolkit)?.run(seed))
}

/// Run the Q-learner. Fails only on an invalid configuration.
pub fn run_q_learning(
    config: QLearningConfig,
    toolkit: SearchToolkit,
    seed: Option<Candidate>,
) -> SearchResult<SearchOutcome> {
    Ok(QLearner::new(config, toolkit)?.run(seed))
}

/// Run the hybrid pipeline. Fails only on an invalid configuration.
pub fn run_hybrid(
    config: HybridConfig,
    toolkit: SearchToolkit,
    seed: Option<Candidate>,
) -> SearchResult<HybridOutcome> {
    Ok(HybridOrchestrator::new(config, toolkit)?.orchestrate(seed))
}
