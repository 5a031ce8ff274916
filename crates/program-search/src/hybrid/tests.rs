//! Tests for the hybrid pipeline

use super::*;
use crate::candidate::Candidate;
use crate::error::SearchResult;
use crate::improvement::CodeImprover;
use crate::test_helpers::{fixed_toolkit, structural_oracle, structural_toolkit, CountingOracle};
use crate::traits::{EngineConfig, SearchStrategy};
use std::sync::Arc;

fn quick(seed: u64) -> HybridConfig {
    let mut config = HybridConfig {
        seed: Some(seed),
        ..HybridConfig::default()
    };
    config.annealing.initial_temperature = 10.0;
    config.annealing.cooling_rate = 0.5;
    config.learning.episodes = 3;
    config.learning.max_steps = 4;
    config
}

#[test]
fn test_hybrid_config_default() {
    let config = HybridConfig::default();
    assert_eq!(config.evolution.population_size, 10);
    assert_eq!(config.evolution.generations, 5);
    assert_eq!(config.annealing, crate::annealing::AnnealingConfig::default());
    assert_eq!(config.learning.episodes, 30);
    assert_eq!(config.learning.max_steps, 15);
    assert_eq!(config.learning.epsilon_start, 0.5);
    assert!(!config.enhance_results);
    assert_eq!(config.engine_name(), "hybrid");
}

#[test]
fn test_hybrid_config_validation() {
    let mut config = HybridConfig::default();
    assert!(config.validate().is_ok());

    config.annealing.cooling_rate = 1.5;
    assert!(config.validate().is_err());
    assert!(HybridOrchestrator::new(config, structural_toolkit()).is_err());

    let mut config = HybridConfig::default();
    config.learning.episodes = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_phase_configs_derive_seeds() {
    let config = HybridConfig {
        seed: Some(40),
        enhance_results: true,
        ..HybridConfig::default()
    };
    let (evolution, annealing, learning) = config.phase_configs();
    assert_eq!(evolution.seed, Some(40));
    assert_eq!(annealing.seed, Some(41));
    assert_eq!(learning.seed, Some(42));
    assert!(evolution.enhance_result && annealing.enhance_result && learning.enhance_result);
}

#[test]
fn test_annealing_starts_from_ga_best() {
    let mut orchestrator = HybridOrchestrator::new(quick(1), structural_toolkit()).unwrap();
    let outcome = orchestrator.orchestrate(None);

    assert_eq!(outcome.phases.len(), 3);
    assert_eq!(outcome.phases[1].start_fitness, outcome.ga_best.fitness());
    assert_eq!(outcome.phases[2].start_fitness, outcome.sa_best.fitness());
}

#[test]
fn test_phases_never_lose_ground() {
    let mut orchestrator = HybridOrchestrator::new(quick(2), structural_toolkit()).unwrap();
    let outcome = orchestrator.orchestrate(None);

    assert!(outcome.annealing_delta() >= 0.0);
    assert!(outcome.learning_delta() >= 0.0);
    assert_eq!(
        outcome.total_delta(),
        outcome.annealing_delta() + outcome.learning_delta()
    );
    let strategies: Vec<&str> = outcome.phases.iter().map(|p| p.strategy.as_str()).collect();
    assert_eq!(strategies, vec!["genetic", "annealing", "q-learning"]);
}

#[test]
fn test_winners_are_not_rescored_between_phases() {
    let oracle = Arc::new(CountingOracle::new(structural_oracle()));
    let mut orchestrator =
        HybridOrchestrator::new(quick(3), fixed_toolkit(oracle.clone())).unwrap();
    let outcome = orchestrator.orchestrate(None);

    let phase_calls: u64 = outcome.phases.iter().map(|p| p.evaluations).sum();
    assert_eq!(phase_calls as usize, oracle.calls());
}

#[test]
fn test_enhancement_applies_to_each_phase() {
    struct Tagging;

    impl CodeImprover for Tagging {
        fn improve(&self, source: &str) -> SearchResult<String> {
            Ok(format!("{}\n# reviewed\n", source.trim_end()))
        }
    }

    let config = HybridConfig {
        enhance_results: true,
        ..quick(4)
    };
    let toolkit = structural_toolkit().with_improver(Arc::new(Tagging));
    let mut orchestrator = HybridOrchestrator::new(config, toolkit).unwrap();
    let outcome = orchestrator.orchestrate(None);

    assert!(outcome.ga_best.source().ends_with("# reviewed\n"));
    assert!(outcome.best.source().ends_with("# reviewed\n"));
    assert!(outcome.best.is_evaluated());
}

#[test]
fn test_strategy_interface() {
    let mut orchestrator = HybridOrchestrator::new(quick(5), structural_toolkit()).unwrap();
    assert_eq!(orchestrator.name(), "hybrid");

    let seed = Candidate::new("def seed():\n    return 1\n");
    let outcome = orchestrator.run(Some(seed));
    assert!(outcome.best.is_evaluated());
    assert!(outcome.metrics.best_fitness >= outcome.metrics.initial_fitness);
    assert!(outcome.metrics.iterations >= 5 + 12);
}
