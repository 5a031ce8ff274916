//! Q-learner implementation

use super::action::Action;
use super::config::QLearningConfig;
use super::state::{discretize, SearchState};
use super::table::QTable;
use crate::candidate::Candidate;
use crate::error::SearchResult;
use crate::generator::program_or_fallback;
use crate::metrics::MetricsCollector;
use crate::toolkit::SearchToolkit;
use crate::traits::{seeded_rng, EngineConfig, SearchOutcome, SearchStrategy};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

/// Tabular Q-learning agent
#[derive(Debug)]
pub struct QLearner {
    config: QLearningConfig,
    toolkit: SearchToolkit,
    rng: StdRng,
    initial_table: QTable,
}

impl QLearner {
    /// Create new Q-learner
    pub fn new(config: QLearningConfig, toolkit: SearchToolkit) -> SearchResult<Self> {
        config.validate()?;
        let rng = seeded_rng(config.seed);
        Ok(Self {
            config,
            toolkit,
            rng,
            initial_table: QTable::new(),
        })
    }

    /// Start the next run from `table` instead of an empty one. The table
    /// is consumed by that run.
    pub fn with_initial_table(mut self, table: QTable) -> Self {
        self.initial_table = table;
        self
    }

    /// Learner configuration
    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    /// Epsilon-greedy choice over `table` for `state`
    pub fn select_action(
        &mut self,
        table: &QTable,
        state: SearchState,
        epsilon: f64,
    ) -> Action {
        if self.rng.gen::<f64>() < epsilon {
            Action::ALL[self.rng.gen_range(0..Action::ALL.len())]
        } else {
            table.greedy_action(state, &mut self.rng)
        }
    }

    /// Apply `action` to `current`. A result failing the validity check is
    /// replaced by a copy of `current`; the flag reports whether that
    /// happened.
    pub fn apply_action(&mut self, current: &Candidate, action: Action) -> (Candidate, bool) {
        let next = action.apply(
            current,
            &self.toolkit,
            self.config.mutation_rate,
            &mut self.rng,
        );
        if next.source() == current.source() {
            return (next, true);
        }

        let (valid, reason) = self.toolkit.validator.is_valid(next.source());
        if valid {
            (next, true)
        } else {
            debug!(
                "Rejected {} transition: {}",
                action,
                reason.as_deref().unwrap_or("invalid source")
            );
            (current.clone(), false)
        }
    }

    fn episode_start(&mut self, seed: Option<&Candidate>) -> Candidate {
        match seed {
            Some(seed) => seed.clone(),
            None => Candidate::new(program_or_fallback(
                self.toolkit.generator.as_ref(),
                &mut self.rng,
            )),
        }
    }

    /// Run all episodes and report the best candidate seen.
    ///
    /// With a seed, every episode restarts from it.
    pub fn learn(&mut self, seed: Option<Candidate>) -> SearchOutcome {
        let mut collector = MetricsCollector::new(self.config.engine_name());
        let oracle = self.toolkit.oracle.clone();
        let mut table = std::mem::take(&mut self.initial_table);
        let mut best: Option<Candidate> = None;

        let seed = seed.map(|mut seed| {
            if seed.evaluate(oracle.as_ref()) {
                collector.record_evaluation();
            }
            seed
        });

        info!(
            "Starting Q-learning: {} episodes x {} steps",
            self.config.episodes, self.config.max_steps
        );

        for episode in 0..self.config.episodes {
            let epsilon = self.config.epsilon(episode);
            let mut current = self.episode_start(seed.as_ref());
            if current.evaluate(oracle.as_ref()) {
                collector.record_evaluation();
            }

            let incumbent = match best.take() {
                None => {
                    collector.set_initial_fitness(current.fitness());
                    current.clone()
                }
                Some(b) if current.fitness() > b.fitness() => current.clone(),
                Some(b) => b,
            };
            let mut best_so_far = incumbent;
            let mut state = discretize(&current);

            for _ in 0..self.config.max_steps {
                collector.start_iteration();

                let action = self.select_action(&table, state, epsilon);
                let (mut next, valid) = self.apply_action(&current, action);
                if !valid {
                    collector.increment("invalid_transitions", 1.0);
                }
                if next.evaluate(oracle.as_ref()) {
                    collector.record_evaluation();
                }

                let reward = next.fitness() - current.fitness();
                let next_state = discretize(&next);
                table.update(
                    state,
                    action,
                    reward,
                    next_state,
                    self.config.learning_rate,
                    self.config.discount,
                );

                if next.fitness() > best_so_far.fitness() {
                    best_so_far = next.clone();
                }

                current = next;
                state = next_state;
                collector.end_iteration(best_so_far.fitness(), None);
            }

            info!(
                "Episode {}: epsilon {:.3}, best {:.2}, {} Q entries",
                episode + 1,
                epsilon,
                best_so_far.fitness(),
                table.len()
            );
            best = Some(best_so_far);
        }

        collector.add_custom_metric("episodes", self.config.episodes as f64);
        collector.add_custom_metric("q_table_size", table.len() as f64);

        // episodes >= 1 is validated, so best is always set here
        let mut best = best.unwrap_or_else(|| self.episode_start(seed.as_ref()));
        if self.config.enhance_result {
            best = self.toolkit.enhance(&best);
        }
        SearchOutcome {
            metrics: collector.finish(best.fitness()),
            best,
        }
    }
}

impl SearchStrategy for QLearner {
    fn name(&self) -> &str {
        self.config.engine_name()
    }

    fn run(&mut self, seed: Option<Candidate>) -> SearchOutcome {
        self.learn(seed)
    }
}
