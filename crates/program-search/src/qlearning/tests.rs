//! Tests for the Q-learner

use super::*;
use crate::candidate::Candidate;
use crate::fitness::FitnessOracle;
use crate::structural::{extract_units, SourceFeatures, ValidityCheck};
use crate::test_helpers::{fixed_toolkit, structural_oracle, structural_toolkit, CountingOracle};
use crate::traits::{EngineConfig, SearchStrategy};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

const SOURCE: &str = "\
def alpha(a, b):
    return a + b

def beta():
    return 3 * 4

class Gamma:
    def run(self):
        return 1
";

fn seeded(seed: u64) -> QLearningConfig {
    QLearningConfig {
        episodes: 4,
        max_steps: 5,
        seed: Some(seed),
        ..QLearningConfig::default()
    }
}

fn state(functions: u8, containers: u8, length: u8, fitness: u8) -> SearchState {
    SearchState {
        functions,
        containers,
        length,
        fitness,
    }
}

struct RejectAll;

struct AcceptAll;

impl ValidityCheck for AcceptAll {
    fn is_valid(&self, _source: &str) -> (bool, Option<String>) {
        (true, None)
    }
}

/// Scores by length and remembers every source it saw
#[derive(Default)]
struct RecordingOracle {
    seen: Mutex<Vec<String>>,
}

impl RecordingOracle {
    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl FitnessOracle for RecordingOracle {
    fn score(&self, source: &str) -> f64 {
        self.seen.lock().unwrap().push(source.to_string());
        source.len() as f64
    }
}

impl ValidityCheck for RejectAll {
    fn is_valid(&self, _source: &str) -> (bool, Option<String>) {
        (false, Some("rejected".into()))
    }
}

#[test]
fn test_config_default() {
    let config = QLearningConfig::default();
    assert_eq!(config.episodes, 50);
    assert_eq!(config.max_steps, 20);
    assert_eq!(config.learning_rate, 0.1);
    assert_eq!(config.discount, 0.9);
    assert_eq!(config.epsilon_start, 1.0);
    assert_eq!(config.epsilon_end, 0.1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation() {
    let invalid = [
        QLearningConfig {
            episodes: 0,
            ..QLearningConfig::default()
        },
        QLearningConfig {
            max_steps: 0,
            ..QLearningConfig::default()
        },
        QLearningConfig {
            learning_rate: 0.0,
            ..QLearningConfig::default()
        },
        QLearningConfig {
            discount: 1.2,
            ..QLearningConfig::default()
        },
        QLearningConfig {
            epsilon_start: -0.5,
            ..QLearningConfig::default()
        },
    ];
    for config in invalid {
        assert!(config.validate().is_err(), "{:?}", config);
    }
}

#[test]
fn test_epsilon_schedule() {
    let config = QLearningConfig::default();
    assert_eq!(config.epsilon(0), 1.0);
    assert!((config.epsilon(49) - 0.1).abs() < 1e-12);
    assert!(config.epsilon(10) > config.epsilon(20));

    let single = QLearningConfig {
        episodes: 1,
        ..QLearningConfig::default()
    };
    assert_eq!(single.epsilon(0), 1.0);
}

#[test]
fn test_discretize_buckets() {
    let features = SourceFeatures {
        functions: 5,
        containers: 2,
        lines: 34,
    };
    assert_eq!(SearchState::from_features(features, 140.0), state(2, 2, 3, 2));

    let saturated = SourceFeatures {
        functions: 40,
        containers: 9,
        lines: 500,
    };
    assert_eq!(
        SearchState::from_features(saturated, 10_000.0),
        state(4, 3, 5, 5)
    );
    assert_eq!(
        SearchState::from_features(SourceFeatures::default(), -3.0),
        state(0, 0, 0, 0)
    );
}

#[test]
fn test_discretize_candidate() {
    let candidate = Candidate::with_fitness(SOURCE, 120.0);
    assert_eq!(discretize(&candidate), state(1, 1, 0, 2));
}

#[test]
fn test_unseen_pairs_read_zero() {
    let table = QTable::new();
    let s = state(0, 0, 0, 0);
    assert!(table.is_empty());
    assert_eq!(table.get(s, Action::AddUnit), 0.0);
    assert_eq!(table.max_value(s), 0.0);
    assert_eq!(table.best_actions(s).len(), Action::ALL.len());
}

#[test]
fn test_q_update_formula() {
    let s = state(1, 0, 2, 1);
    let next = state(1, 1, 2, 2);
    let table = QTable::new()
        .updated(next, Action::NoOp, 10.0, next, 1.0, 0.0)
        .updated(s, Action::AddContainer, 5.0, next, 0.1, 0.9);

    // 0 + 0.1 * (5 + 0.9 * 10 - 0)
    assert!((table.get(s, Action::AddContainer) - 1.4).abs() < 1e-12);
    assert_eq!(table.len(), 2);
}

#[test]
fn test_q_update_moves_toward_target() {
    let s = state(0, 0, 0, 0);
    let mut table = QTable::new();
    table.update(s, Action::AddUnit, 3.0, s, 0.5, 0.0);
    let before = table.get(s, Action::AddUnit);

    let target = -4.0;
    let after = table.update(s, Action::AddUnit, target, s, 0.5, 0.0);
    assert!(after < before);
    assert!(after > target);
}

#[test]
fn test_greedy_action_breaks_ties_uniformly() {
    let s = state(0, 0, 0, 0);
    let table = QTable::new()
        .updated(s, Action::AddUnit, 1.0, s, 1.0, 0.0)
        .updated(s, Action::PerturbOperator, 1.0, s, 1.0, 0.0);

    assert_eq!(
        table.best_actions(s),
        vec![Action::AddUnit, Action::PerturbOperator]
    );

    let mut rng = StdRng::seed_from_u64(8);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..100 {
        let action = table.greedy_action(s, &mut rng);
        assert!(action == Action::AddUnit || action == Action::PerturbOperator);
        seen.insert(action);
    }
    assert_eq!(seen.len(), 2);
}

#[test]
fn test_actions_edit_structure() {
    let toolkit = structural_toolkit();
    let mut rng = StdRng::seed_from_u64(9);
    let current = Candidate::with_fitness(SOURCE, 50.0);
    let base = SourceFeatures::of(SOURCE);

    let next = Action::AddUnit.apply(&current, &toolkit, 1.0, &mut rng);
    assert_eq!(SourceFeatures::of(next.source()).functions, base.functions + 1);
    assert!(!next.is_evaluated());

    let next = Action::RemoveUnit.apply(&current, &toolkit, 1.0, &mut rng);
    assert_eq!(SourceFeatures::of(next.source()).functions, base.functions - 1);

    let next = Action::AddContainer.apply(&current, &toolkit, 1.0, &mut rng);
    assert_eq!(SourceFeatures::of(next.source()).containers, base.containers + 1);

    let next = Action::RemoveContainer.apply(&current, &toolkit, 1.0, &mut rng);
    assert_eq!(SourceFeatures::of(next.source()).containers, 0);

    let next = Action::PerturbOperator.apply(&current, &toolkit, 1.0, &mut rng);
    assert_ne!(next.source(), SOURCE);

    let next = Action::NoOp.apply(&current, &toolkit, 1.0, &mut rng);
    assert_eq!(next.source(), SOURCE);
    assert_eq!(next.fitness(), 50.0);

    assert_eq!(current.source(), SOURCE);
}

#[test]
fn test_impossible_action_copies_candidate() {
    let toolkit = structural_toolkit();
    let mut rng = StdRng::seed_from_u64(10);
    let current = Candidate::with_fitness("x = 1\n", 10.0);
    let next = Action::RemoveContainer.apply(&current, &toolkit, 1.0, &mut rng);
    assert_eq!(next, current);
}

#[test]
fn test_invalid_transition_is_noop() {
    let toolkit = structural_toolkit().with_validator(Arc::new(RejectAll));
    let mut learner = QLearner::new(seeded(11), toolkit).unwrap();
    let current = Candidate::with_fitness(SOURCE, 50.0);

    let (next, valid) = learner.apply_action(&current, Action::AddUnit);
    assert!(!valid);
    assert_eq!(next.source(), SOURCE);
    assert_eq!(next.fitness(), 50.0);
}

#[test]
fn test_learn_tracks_global_best() {
    let mut learner = QLearner::new(seeded(12), structural_toolkit()).unwrap();
    let outcome = learner.run(None);

    assert_eq!(outcome.metrics.iterations, 20);
    assert!(outcome.metrics.history.is_monotonic());
    assert!(outcome.best.is_evaluated());
    assert!(outcome.best.fitness() >= outcome.metrics.initial_fitness);
    assert!(outcome.metrics.custom("q_table_size") >= 1.0);
    assert_eq!(outcome.metrics.custom("episodes"), 4.0);
}

#[test]
fn test_rejected_transitions_keep_seed_best() {
    let toolkit = structural_toolkit().with_validator(Arc::new(RejectAll));
    let config = QLearningConfig {
        mutation_rate: 1.0,
        ..seeded(13)
    };
    let mut learner = QLearner::new(config, toolkit).unwrap();
    let seed = Candidate::with_fitness(SOURCE, 75.0);
    let outcome = learner.run(Some(seed.clone()));

    assert_eq!(outcome.best.id, seed.id);
    assert_eq!(outcome.best.fitness(), 75.0);
    assert_eq!(outcome.metrics.initial_fitness, 75.0);
}

#[test]
fn test_seed_is_scored_once() {
    let oracle = Arc::new(CountingOracle::new(structural_oracle()));
    let toolkit = fixed_toolkit(oracle.clone()).with_validator(Arc::new(RejectAll));
    let mut learner = QLearner::new(seeded(14), toolkit).unwrap();
    learner.run(Some(Candidate::new(SOURCE)));

    // every transition is rejected, so only the seed is ever scored
    assert_eq!(oracle.calls(), 1);
}

#[test]
fn test_every_episode_restarts_from_seed() {
    const SEED: &str = "x = 1\n";
    let oracle = Arc::new(RecordingOracle::default());
    let toolkit = fixed_toolkit(oracle.clone()).with_validator(Arc::new(AcceptAll));
    let config = QLearningConfig {
        episodes: 4,
        max_steps: 1,
        epsilon_start: 0.0,
        epsilon_end: 0.0,
        seed: Some(15),
        ..QLearningConfig::default()
    };

    // make add-unit the greedy choice from the seed's state
    let seed_state = discretize(&Candidate::with_fitness(SEED, SEED.len() as f64));
    let table =
        QTable::new().updated(seed_state, Action::AddUnit, 100.0, seed_state, 1.0, 0.0);
    let mut learner = QLearner::new(config, toolkit)
        .unwrap()
        .with_initial_table(table);
    learner.run(Some(Candidate::new(SEED)));

    let seen = oracle.seen();
    assert_eq!(seen.len(), 5);
    assert_eq!(seen[0], SEED);
    for source in &seen[1..] {
        assert!(source.starts_with(SEED), "{}", source);
        assert_eq!(extract_units(source).functions.len(), 1, "{}", source);
    }
}

#[test]
fn test_initial_table_is_consumed_by_one_run() {
    let full = state(4, 3, 5, 5);
    let table = [Action::NoOp, Action::AddUnit, Action::RemoveUnit]
        .into_iter()
        .fold(QTable::new(), |table, action| {
            table.updated(full, action, 1.0, full, 1.0, 0.0)
        });
    let config = QLearningConfig {
        episodes: 1,
        max_steps: 1,
        ..seeded(16)
    };
    let mut learner = QLearner::new(config, structural_toolkit())
        .unwrap()
        .with_initial_table(table);

    let first = learner.run(None);
    let second = learner.run(None);
    assert!(first.metrics.custom("q_table_size") >= 3.0);
    assert_eq!(second.metrics.custom("q_table_size"), 1.0);
}

proptest! {
    #[test]
    fn prop_discretize_is_pure(
        functions in 0usize..100,
        containers in 0usize..100,
        lines in 0usize..1000,
        fitness in -100.0f64..1000.0,
    ) {
        let features = SourceFeatures { functions, containers, lines };
        let a = SearchState::from_features(features, fitness);
        let b = SearchState::from_features(features, fitness);
        prop_assert_eq!(a, b);
        prop_assert!(a.functions <= 4 && a.containers <= 3 && a.length <= 5 && a.fitness <= 5);
    }

    #[test]
    fn prop_update_never_moves_away(
        initial in -100.0f64..100.0,
        reward in -100.0f64..100.0,
        alpha in 0.01f64..0.99,
    ) {
        let s = state(0, 0, 0, 0);
        let next = state(1, 0, 0, 0);
        let table = QTable::new().updated(s, Action::NoOp, initial, next, 1.0, 0.0);
        let target = reward;
        let before = table.get(s, Action::NoOp);
        let after = table.updated(s, Action::NoOp, reward, next, alpha, 0.9).get(s, Action::NoOp);
        prop_assert!((target - after).abs() <= (target - before).abs());
    }
}
