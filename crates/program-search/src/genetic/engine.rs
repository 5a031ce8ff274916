//! Genetic engine implementation

use super::config::EvolutionConfig;
use crate::candidate::Candidate;
use crate::error::SearchResult;
use crate::generator::program_or_fallback;
use crate::metrics::MetricsCollector;
use crate::mutation::mutate;
use crate::population::Population;
use crate::structural::{extract_units, recombine};
use crate::toolkit::SearchToolkit;
use crate::traits::{seeded_rng, EngineConfig, SearchOutcome, SearchStrategy};
use rand::rngs::StdRng;
use tracing::{debug, info};

/// Genetic engine
#[derive(Debug)]
pub struct GeneticEngine {
    config: EvolutionConfig,
    toolkit: SearchToolkit,
    rng: StdRng,
}

impl GeneticEngine {
    /// Create new genetic engine
    pub fn new(config: EvolutionConfig, toolkit: SearchToolkit) -> SearchResult<Self> {
        config.validate()?;
        let rng = seeded_rng(config.seed);
        Ok(Self {
            config,
            toolkit,
            rng,
        })
    }

    /// Engine configuration
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// `N` freshly synthesized candidates; a warm-start seed takes the
    /// first slot
    pub fn initialize_population(&mut self, seed: Option<Candidate>) -> Population {
        let mut population = Population::new();
        if let Some(seed) = seed {
            population.add(seed);
        }
        while population.size() < self.config.population_size {
            let source = program_or_fallback(self.toolkit.generator.as_ref(), &mut self.rng);
            population.add(Candidate::new(source));
        }
        population
    }

    /// Child built from the units of both parents
    pub fn crossover(&mut self, parent_a: &Candidate, parent_b: &Candidate) -> Candidate {
        let source = recombine(
            &extract_units(parent_a.source()),
            &extract_units(parent_b.source()),
            self.config.recombine,
            &mut self.rng,
            self.toolkit.generator.as_ref(),
        );
        Candidate::new(source)
    }

    /// Breed generation `g + 1` from a population sorted by fitness
    pub fn next_generation(&mut self, population: &Population) -> Population {
        let mut next = Population::from_candidates(population.elites(self.config.elite_count));
        next.generation = population.generation + 1;

        while next.size() < self.config.population_size {
            let parents = (
                population.tournament_select(self.config.tournament_size, &mut self.rng),
                population.tournament_select(self.config.tournament_size, &mut self.rng),
            );
            let child = match parents {
                (Some(a), Some(b)) => self.crossover(a, b),
                _ => Candidate::new(program_or_fallback(
                    self.toolkit.generator.as_ref(),
                    &mut self.rng,
                )),
            };
            let child = mutate(
                &child,
                self.config.mutation_rate,
                &mut self.rng,
                self.toolkit.generator.as_ref(),
            );
            next.add(child);
        }
        next
    }

    /// Run all generations and report the best of the last one
    pub fn evolve(&mut self, seed: Option<Candidate>) -> SearchOutcome {
        let mut collector = MetricsCollector::new(self.config.engine_name());
        let mut population = self.initialize_population(seed);

        info!(
            "Starting genetic search: {} candidates x {} generations",
            self.config.population_size, self.config.generations
        );

        for generation in 0..self.config.generations {
            collector.start_iteration();

            let calls = population.evaluate(self.toolkit.oracle.as_ref());
            for _ in 0..calls {
                collector.record_evaluation();
            }
            population.sort_by_fitness();

            let best = population.candidates[0].fitness();
            let average = population.average_fitness();
            if generation == 0 {
                collector.set_initial_fitness(best);
            }
            collector.end_iteration(best, Some(average));
            info!(
                "Generation {}: best {:.2}, average {:.2}",
                generation + 1,
                best,
                average
            );

            if generation + 1 == self.config.generations {
                break;
            }
            population = self.next_generation(&population);
            debug!("Bred generation {}", population.generation);
        }

        let mut best = population.candidates[0].clone();
        if self.config.enhance_result {
            best = self.toolkit.enhance(&best);
        }
        SearchOutcome {
            metrics: collector.finish(best.fitness()),
            best,
        }
    }
}

impl SearchStrategy for GeneticEngine {
    fn name(&self) -> &str {
        self.config.engine_name()
    }

    fn run(&mut self, seed: Option<Candidate>) -> SearchOutcome {
        self.evolve(seed)
    }
}
