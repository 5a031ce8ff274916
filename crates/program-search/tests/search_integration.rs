//! End-to-end tests through the public API

use program_search::fitness::{CodeExecutor, ExecutionOutcome, ExecutorConfig, PythonExecutor};
use program_search::generator::{GeneratorConfig, PythonProgramGenerator};
use program_search::store::ArtifactSelector;
use program_search::structural::{SyntaxValidator, ValidityCheck};
use program_search::{
    run_annealing, run_evolution, run_hybrid, run_q_learning, AnnealingConfig, ArtifactStore,
    Candidate, EvolutionConfig, FileArtifactStore, FitnessConfig, HybridConfig, ProgramFitness,
    QLearningConfig, SearchConfig, SearchToolkit,
};
use std::sync::Arc;
use std::time::Duration;

struct InstantSuccess;

impl CodeExecutor for InstantSuccess {
    fn execute(&self, _source: &str) -> ExecutionOutcome {
        ExecutionOutcome::Success {
            elapsed: Duration::ZERO,
        }
    }
}

fn offline_toolkit() -> SearchToolkit {
    let oracle = ProgramFitness::new(FitnessConfig::default(), Arc::new(InstantSuccess)).unwrap();
    SearchToolkit::new(
        Arc::new(oracle),
        Arc::new(PythonProgramGenerator::new(GeneratorConfig::default()).unwrap()),
    )
}

fn python_available() -> bool {
    let available = PythonExecutor::new(ExecutorConfig::default()).is_available();
    if !available {
        eprintln!("python3 not available, skipping");
    }
    available
}

#[test]
fn test_every_strategy_returns_valid_programs() {
    let validator = SyntaxValidator;

    let genetic = run_evolution(
        EvolutionConfig {
            seed: Some(1),
            ..EvolutionConfig::default()
        },
        offline_toolkit(),
        None,
    )
    .unwrap();

    let annealing = run_annealing(
        AnnealingConfig {
            seed: Some(2),
            ..AnnealingConfig::default()
        },
        offline_toolkit(),
        Some(genetic.best.clone()),
    )
    .unwrap();

    let learning = run_q_learning(
        QLearningConfig {
            episodes: 5,
            max_steps: 5,
            seed: Some(3),
            ..QLearningConfig::default()
        },
        offline_toolkit(),
        Some(annealing.best.clone()),
    )
    .unwrap();

    for outcome in [&genetic, &annealing, &learning] {
        let (valid, reason) = validator.is_valid(outcome.best.source());
        assert!(valid, "{:?}\n{}", reason, outcome.best.source());
        assert!(outcome.best.fitness() > 0.0);
    }
    assert!(annealing.best.fitness() >= genetic.best.fitness());
    assert!(learning.best.fitness() >= annealing.best.fitness());
}

#[test]
fn test_seeded_hybrid_is_reproducible() {
    let config = HybridConfig {
        seed: Some(21),
        ..HybridConfig::default()
    };
    let first = run_hybrid(config.clone(), offline_toolkit(), None).unwrap();
    let second = run_hybrid(config, offline_toolkit(), None).unwrap();

    assert_eq!(first.best.source(), second.best.source());
    assert_eq!(first.phases.len(), 3);
    assert_eq!(first.phases[1].start_fitness, first.ga_best.fitness());
}

#[test]
fn test_python_backed_evolution() {
    if !python_available() {
        return;
    }

    let config = SearchConfig::builder().seed(5).build().unwrap();
    let toolkit = config.toolkit().unwrap();
    let outcome = run_evolution(
        EvolutionConfig {
            population_size: 4,
            generations: 2,
            ..config.evolution.clone()
        },
        toolkit,
        None,
    )
    .unwrap();

    // generated programs run cleanly, so the success reward dominates
    assert!(outcome.best.fitness() >= 100.0);
}

#[test]
fn test_python_backed_scoring_of_faults() {
    if !python_available() {
        return;
    }

    let oracle = ProgramFitness::new(
        FitnessConfig::default(),
        Arc::new(PythonExecutor::new(ExecutorConfig::default())),
    )
    .unwrap();

    let breakdown = oracle.breakdown("def f():\n    return 1 // 0\n\nf()\n");
    assert!(matches!(
        breakdown.outcome,
        ExecutionOutcome::RecoverableFault { .. }
    ));
    assert_eq!(breakdown.execution, 30.0);
}

#[tokio::test]
async fn test_best_candidate_round_trips_through_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = FileArtifactStore::new(dir.path());

    let outcome = run_annealing(
        AnnealingConfig {
            seed: Some(8),
            ..AnnealingConfig::default()
        },
        offline_toolkit(),
        None,
    )
    .unwrap();

    let saved = store
        .save(outcome.best.source(), "annealing", outcome.best.fitness())
        .await
        .unwrap();
    let loaded = store.load(&ArtifactSelector::Latest).await.unwrap();

    assert_eq!(loaded.metadata, saved);
    assert_eq!(loaded.source, outcome.best.source());

    let restored = Candidate::with_fitness(loaded.source, loaded.metadata.fitness);
    assert_eq!(restored.fitness(), outcome.best.fitness());
}
