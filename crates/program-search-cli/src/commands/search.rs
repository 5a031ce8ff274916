//! Search commands: evolve, anneal, learn and hybrid

use crate::config::CliConfig;
use crate::{output, Result};
use clap::Args;
use program_search::fitness::PythonExecutor;
use program_search::hybrid::PhaseReport;
use program_search::store::ArtifactMetadata;
use program_search::{
    run_annealing, run_evolution, run_hybrid, run_q_learning, AnnealingConfig, ArtifactStore,
    Candidate, EvolutionConfig, FileArtifactStore, HybridConfig, QLearningConfig, SearchMetrics,
    SearchResult, SearchToolkit,
};
use serde::Serialize;
use std::path::PathBuf;

/// Options shared by every search command
#[derive(Debug, Clone, Default, Args)]
pub struct SearchArgs {
    /// Random seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Source file to start from instead of a synthesized program
    #[arg(long, value_name = "FILE")]
    pub seed_file: Option<PathBuf>,

    /// Pass the result through the configured improvement command
    #[arg(long)]
    pub enhance: bool,

    /// Save the best program under this label
    #[arg(long, value_name = "LABEL")]
    pub save: Option<String>,

    /// Print a JSON report instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct EvolveArgs {
    #[command(flatten)]
    pub common: SearchArgs,

    /// Population size
    #[arg(long)]
    pub population: Option<usize>,

    /// Number of generations
    #[arg(long)]
    pub generations: Option<u32>,

    /// Members sampled per tournament
    #[arg(long)]
    pub tournament_size: Option<usize>,

    /// Elites copied into each generation
    #[arg(long)]
    pub elites: Option<usize>,

    /// Probability of mutating a child (0.0-1.0)
    #[arg(long)]
    pub mutation_rate: Option<f64>,
}

impl EvolveArgs {
    pub fn config(&self, default_seed: Option<u64>) -> EvolutionConfig {
        let mut config = EvolutionConfig {
            seed: self.common.seed.or(default_seed),
            enhance_result: self.common.enhance,
            ..EvolutionConfig::default()
        };
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(generations) = self.generations {
            config.generations = generations;
        }
        if let Some(tournament_size) = self.tournament_size {
            config.tournament_size = tournament_size;
        }
        if let Some(elites) = self.elites {
            config.elite_count = elites;
        }
        if let Some(mutation_rate) = self.mutation_rate {
            config.mutation_rate = mutation_rate;
        }
        config
    }
}

#[derive(Debug, Clone, Args)]
pub struct AnnealArgs {
    #[command(flatten)]
    pub common: SearchArgs,

    /// Starting temperature
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Geometric cooling factor (0.0-1.0, exclusive)
    #[arg(long)]
    pub cooling_rate: Option<f64>,

    /// Temperature at which the schedule stops
    #[arg(long)]
    pub min_temperature: Option<f64>,

    /// Probability of a generic mutation per proposal (0.0-1.0)
    #[arg(long)]
    pub mutation_rate: Option<f64>,
}

impl AnnealArgs {
    pub fn config(&self, default_seed: Option<u64>) -> AnnealingConfig {
        let mut config = AnnealingConfig {
            seed: self.common.seed.or(default_seed),
            enhance_result: self.common.enhance,
            ..AnnealingConfig::default()
        };
        if let Some(temperature) = self.temperature {
            config.initial_temperature = temperature;
        }
        if let Some(cooling_rate) = self.cooling_rate {
            config.cooling_rate = cooling_rate;
        }
        if let Some(min_temperature) = self.min_temperature {
            config.min_temperature = min_temperature;
        }
        if let Some(mutation_rate) = self.mutation_rate {
            config.mutation_rate = mutation_rate;
        }
        config
    }
}

#[derive(Debug, Clone, Args)]
pub struct LearnArgs {
    #[command(flatten)]
    pub common: SearchArgs,

    /// Number of episodes
    #[arg(long)]
    pub episodes: Option<usize>,

    /// Steps per episode
    #[arg(long)]
    pub steps: Option<usize>,

    /// Learning rate alpha
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Discount factor gamma
    #[arg(long)]
    pub discount: Option<f64>,

    /// Exploration rate of the first episode
    #[arg(long)]
    pub epsilon: Option<f64>,
}

impl LearnArgs {
    pub fn config(&self, default_seed: Option<u64>) -> QLearningConfig {
        let mut config = QLearningConfig {
            seed: self.common.seed.or(default_seed),
            enhance_result: self.common.enhance,
            ..QLearningConfig::default()
        };
        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(steps) = self.steps {
            config.max_steps = steps;
        }
        if let Some(learning_rate) = self.learning_rate {
            config.learning_rate = learning_rate;
        }
        if let Some(discount) = self.discount {
            config.discount = discount;
        }
        if let Some(epsilon) = self.epsilon {
            config.epsilon_start = epsilon;
        }
        config
    }
}

#[derive(Debug, Clone, Args)]
pub struct HybridArgs {
    #[command(flatten)]
    pub common: SearchArgs,

    /// Population size of the genetic phase
    #[arg(long)]
    pub population: Option<usize>,

    /// Generations of the genetic phase
    #[arg(long)]
    pub generations: Option<u32>,

    /// Starting temperature of the annealing phase
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Episodes of the Q-learning phase
    #[arg(long)]
    pub episodes: Option<usize>,

    /// Steps per Q-learning episode
    #[arg(long)]
    pub steps: Option<usize>,
}

impl HybridArgs {
    pub fn config(&self, default_seed: Option<u64>) -> HybridConfig {
        let mut config = HybridConfig {
            seed: self.common.seed.or(default_seed),
            enhance_results: self.common.enhance,
            ..HybridConfig::default()
        };
        if let Some(population) = self.population {
            config.evolution.population_size = population;
        }
        if let Some(generations) = self.generations {
            config.evolution.generations = generations;
        }
        if let Some(temperature) = self.temperature {
            config.annealing.initial_temperature = temperature;
        }
        if let Some(episodes) = self.episodes {
            config.learning.episodes = episodes;
        }
        if let Some(steps) = self.steps {
            config.learning.max_steps = steps;
        }
        config
    }
}

/// Machine-readable summary of one search command
#[derive(Debug, Serialize)]
struct SearchReport<'a> {
    strategy: &'a str,
    best_fitness: f64,
    source: &'a str,
    metrics: &'a [SearchMetrics],
    #[serde(skip_serializing_if = "Option::is_none")]
    phases: Option<&'a [PhaseReport]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact: Option<ArtifactMetadata>,
}

/// Collaborators and warm-start candidate for one run
struct Session {
    toolkit: SearchToolkit,
    seed: Option<Candidate>,
}

async fn prepare(common: &SearchArgs, config: &CliConfig) -> Result<Session> {
    let search = config.search_config();

    let sandbox = PythonExecutor::new(search.executor.clone());
    if !tokio::task::spawn_blocking(move || sandbox.is_available()).await? {
        output::warn(&format!(
            "Interpreter '{}' is not available; every candidate will score as a fault",
            search.executor.interpreter
        ));
    }
    if common.enhance && search.improver.is_none() {
        output::warn("No improvement command configured; --enhance leaves results unchanged");
    }

    let seed = match &common.seed_file {
        Some(path) => {
            let source = tokio::fs::read_to_string(path).await?;
            tracing::debug!("Warm-starting from {}", path.display());
            Some(Candidate::new(source))
        }
        None => None,
    };

    Ok(Session {
        toolkit: search.toolkit()?,
        seed,
    })
}

/// Run a blocking search off the async runtime behind a spinner
async fn run_blocking<T, F>(label: &str, quiet: bool, job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> SearchResult<T> + Send + 'static,
{
    let pb = output::spinner(&format!("Running {}...", label), quiet);
    let result = tokio::task::spawn_blocking(job).await;
    pb.finish_and_clear();
    Ok(result??)
}

async fn save_best(label: &str, best: &Candidate, config: &CliConfig) -> Option<ArtifactMetadata> {
    let store = FileArtifactStore::new(&config.artifact_dir);
    match store.save(best.source(), label, best.fitness()).await {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            output::warn(&format!("Could not save artifact '{}': {}", label, e));
            None
        }
    }
}

async fn finish(
    common: &SearchArgs,
    config: &CliConfig,
    strategy: &str,
    best: &Candidate,
    metrics: &[SearchMetrics],
    phases: Option<&[PhaseReport]>,
) -> Result<()> {
    let artifact = match &common.save {
        Some(label) => save_best(label, best, config).await,
        None => None,
    };

    if common.json {
        let report = SearchReport {
            strategy,
            best_fitness: best.fitness(),
            source: best.source(),
            metrics,
            phases,
            artifact,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::header(&format!("{} result", strategy));
    if let Some(phases) = phases {
        for phase in phases {
            output::bullet(&format!(
                "{}: {:.2} -> {} ({}), {} evaluations in {:.2?}",
                phase.strategy,
                phase.start_fitness,
                output::fitness(phase.best_fitness, phase.start_fitness),
                output::delta(phase.improvement()),
                phase.evaluations,
                phase.elapsed
            ));
        }
        println!();
    }
    for run in metrics {
        if phases.is_none() {
            output::kv("Initial fitness", &format!("{:.2}", run.initial_fitness));
            output::kv(
                "Best fitness",
                &output::fitness(run.best_fitness, run.initial_fitness),
            );
            output::kv("Improvement", &output::delta(run.improvement()));
            output::kv("Iterations", &run.iterations.to_string());
            output::kv("Evaluations", &run.total_evaluations.to_string());
            output::kv("Elapsed", &format!("{:.2?}", run.elapsed_time));
        }
        let mut custom: Vec<_> = run.custom_metrics.iter().collect();
        custom.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in custom {
            output::bullet(&format!("{} {}: {}", run.strategy, name, value));
        }
    }
    if phases.is_some() {
        output::kv("Final fitness", &format!("{:.2}", best.fitness()));
    }

    output::header("Best program");
    output::source(best.source());

    if let Some(artifact) = artifact {
        output::success(&format!(
            "Saved '{}' to {}",
            artifact.label,
            artifact.location.display()
        ));
    }
    Ok(())
}

pub async fn evolve(args: EvolveArgs, config: &CliConfig) -> Result<()> {
    let evolution = args.config(config.seed);
    let session = prepare(&args.common, config).await?;
    let outcome = run_blocking("genetic search", args.common.json, move || {
        run_evolution(evolution, session.toolkit, session.seed)
    })
    .await?;
    finish(
        &args.common,
        config,
        "genetic",
        &outcome.best,
        std::slice::from_ref(&outcome.metrics),
        None,
    )
    .await
}

pub async fn anneal(args: AnnealArgs, config: &CliConfig) -> Result<()> {
    let annealing = args.config(config.seed);
    let session = prepare(&args.common, config).await?;
    let outcome = run_blocking("simulated annealing", args.common.json, move || {
        run_annealing(annealing, session.toolkit, session.seed)
    })
    .await?;
    finish(
        &args.common,
        config,
        "annealing",
        &outcome.best,
        std::slice::from_ref(&outcome.metrics),
        None,
    )
    .await
}

pub async fn learn(args: LearnArgs, config: &CliConfig) -> Result<()> {
    let learning = args.config(config.seed);
    let session = prepare(&args.common, config).await?;
    let outcome = run_blocking("Q-learning", args.common.json, move || {
        run_q_learning(learning, session.toolkit, session.seed)
    })
    .await?;
    finish(
        &args.common,
        config,
        "q-learning",
        &outcome.best,
        std::slice::from_ref(&outcome.metrics),
        None,
    )
    .await
}

pub async fn hybrid(args: HybridArgs, config: &CliConfig) -> Result<()> {
    let hybrid = args.config(config.seed);
    let session = prepare(&args.common, config).await?;
    let outcome = run_blocking("hybrid pipeline", args.common.json, move || {
        run_hybrid(hybrid, session.toolkit, session.seed)
    })
    .await?;
    finish(
        &args.common,
        config,
        "hybrid",
        &outcome.best,
        &outcome.metrics,
        Some(outcome.phases.as_slice()),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn common(seed: Option<u64>) -> SearchArgs {
        SearchArgs {
            seed,
            enhance: true,
            ..SearchArgs::default()
        }
    }

    #[test]
    fn test_evolve_overrides() {
        let args = EvolveArgs {
            common: common(None),
            population: Some(20),
            generations: None,
            tournament_size: Some(4),
            elites: None,
            mutation_rate: Some(0.5),
        };
        let config = args.config(Some(8));
        assert_eq!(config.population_size, 20);
        assert_eq!(config.generations, 5);
        assert_eq!(config.tournament_size, 4);
        assert_eq!(config.elite_count, 2);
        assert_eq!(config.mutation_rate, 0.5);
        assert_eq!(config.seed, Some(8));
        assert!(config.enhance_result);
    }

    #[test]
    fn test_command_seed_beats_config_seed() {
        let args = AnnealArgs {
            common: common(Some(1)),
            temperature: Some(10.0),
            cooling_rate: None,
            min_temperature: None,
            mutation_rate: None,
        };
        let config = args.config(Some(8));
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.initial_temperature, 10.0);
        assert_eq!(config.cooling_rate, 0.95);
    }

    #[test]
    fn test_learn_overrides() {
        let args = LearnArgs {
            common: common(None),
            episodes: Some(5),
            steps: Some(3),
            learning_rate: None,
            discount: Some(0.5),
            epsilon: Some(0.2),
        };
        let config = args.config(None);
        assert_eq!(config.episodes, 5);
        assert_eq!(config.max_steps, 3);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.discount, 0.5);
        assert_eq!(config.epsilon_start, 0.2);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_hybrid_overrides_keep_phase_defaults() {
        let args = HybridArgs {
            common: common(Some(3)),
            population: Some(6),
            generations: None,
            temperature: None,
            episodes: Some(4),
            steps: None,
        };
        let config = args.config(None);
        assert_eq!(config.evolution.population_size, 6);
        assert_eq!(config.evolution.generations, 5);
        assert_eq!(config.learning.episodes, 4);
        assert_eq!(config.learning.max_steps, 15);
        assert_eq!(config.seed, Some(3));
        assert!(config.enhance_results);
    }

    #[tokio::test]
    async fn test_save_failure_is_reported_not_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();
        let config = CliConfig {
            artifact_dir: blocker,
            ..CliConfig::default()
        };

        let best = Candidate::with_fitness("def f():\n    return 1\n", 12.0);
        assert!(save_best("run", &best, &config).await.is_none());
    }

    #[tokio::test]
    async fn test_save_writes_artifact() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = CliConfig {
            artifact_dir: dir.path().to_path_buf(),
            ..CliConfig::default()
        };

        let best = Candidate::with_fitness("def f():\n    return 1\n", 12.0);
        let metadata = save_best("first run", &best, &config).await.unwrap();
        assert_eq!(metadata.label, "first run");
        assert_eq!(metadata.fitness, 12.0);
        assert!(metadata.location.exists());
    }
}
