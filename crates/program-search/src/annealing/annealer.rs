//! Annealer implementation

use super::config::AnnealingConfig;
use crate::candidate::Candidate;
use crate::error::SearchResult;
use crate::generator::program_or_fallback;
use crate::metrics::MetricsCollector;
use crate::mutation::mutate;
use crate::toolkit::SearchToolkit;
use crate::traits::{seeded_rng, EngineConfig, SearchOutcome, SearchStrategy};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

/// Metropolis acceptance probability of a move changing fitness by `delta`.
///
/// Improvements are always accepted. Otherwise `exp(delta / T)`, which lies
/// in `(0, 1]` for `delta <= 0` and positive `T`. A non-positive temperature
/// only accepts improvements.
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta > 0.0 {
        1.0
    } else if temperature > 0.0 {
        (delta / temperature).exp()
    } else {
        0.0
    }
}

/// Simulated annealer
#[derive(Debug)]
pub struct Annealer {
    config: AnnealingConfig,
    toolkit: SearchToolkit,
    rng: StdRng,
}

impl Annealer {
    /// Create new annealer
    pub fn new(config: AnnealingConfig, toolkit: SearchToolkit) -> SearchResult<Self> {
        config.validate()?;
        let rng = seeded_rng(config.seed);
        Ok(Self {
            config,
            toolkit,
            rng,
        })
    }

    /// Annealer configuration
    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    /// Anneal from `seed`, or from a fresh program when absent.
    ///
    /// An already evaluated seed keeps its fitness as the starting point.
    pub fn anneal(&mut self, seed: Option<Candidate>) -> SearchOutcome {
        let mut collector = MetricsCollector::new(self.config.engine_name());
        let oracle = self.toolkit.oracle.clone();

        let mut current = seed.unwrap_or_else(|| {
            Candidate::new(program_or_fallback(
                self.toolkit.generator.as_ref(),
                &mut self.rng,
            ))
        });
        if current.evaluate(oracle.as_ref()) {
            collector.record_evaluation();
        }
        collector.set_initial_fitness(current.fitness());

        let mut best = current.clone();
        let mut temperature = self.config.initial_temperature;

        info!(
            "Starting annealing at T={} from fitness {:.2}",
            temperature,
            current.fitness()
        );

        while temperature > self.config.min_temperature {
            collector.start_iteration();

            let mut proposal = mutate(
                &current,
                self.config.mutation_rate,
                &mut self.rng,
                self.toolkit.generator.as_ref(),
            );
            if proposal.evaluate(oracle.as_ref()) {
                collector.record_evaluation();
            }

            let delta = proposal.fitness() - current.fitness();
            let accepted = delta > 0.0
                || self.rng.gen::<f64>() < acceptance_probability(delta, temperature);
            if accepted {
                current = proposal;
                collector.increment("accepted", 1.0);
            } else {
                collector.increment("rejected", 1.0);
            }

            if current.fitness() > best.fitness() {
                best = current.clone();
                debug!("New best {:.2} at T={:.4}", best.fitness(), temperature);
            }

            temperature *= self.config.cooling_rate;
            collector.end_iteration(best.fitness(), None);
        }

        info!(
            "Annealing finished after {} steps, best {:.2}",
            collector.metrics().iterations,
            best.fitness()
        );

        if self.config.enhance_result {
            best = self.toolkit.enhance(&best);
        }
        SearchOutcome {
            metrics: collector.finish(best.fitness()),
            best,
        }
    }
}

impl SearchStrategy for Annealer {
    fn name(&self) -> &str {
        self.config.engine_name()
    }

    fn run(&mut self, seed: Option<Candidate>) -> SearchOutcome {
        self.anneal(seed)
    }
}
