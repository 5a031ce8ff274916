//! Command implementations

pub mod artifacts;
pub mod generate;
pub mod score;
pub mod search;

use crate::config::CliConfig;
use crate::Result;
use clap::Subcommand;

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print a freshly synthesized program
    Generate(generate::GenerateArgs),

    /// Run the genetic engine
    Evolve(search::EvolveArgs),

    /// Run simulated annealing
    Anneal(search::AnnealArgs),

    /// Run the Q-learning agent
    Learn(search::LearnArgs),

    /// Run genetic search, then annealing, then Q-learning
    Hybrid(search::HybridArgs),

    /// Score a source file with the fitness oracle
    Score(score::ScoreArgs),

    /// Inspect saved artifacts
    Artifacts(artifacts::ArtifactsArgs),

    /// Enter the interactive menu
    Menu,
}

impl Commands {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        match self {
            Commands::Generate(args) => generate::execute(args, config).await,
            Commands::Evolve(args) => search::evolve(args, config).await,
            Commands::Anneal(args) => search::anneal(args, config).await,
            Commands::Learn(args) => search::learn(args, config).await,
            Commands::Hybrid(args) => search::hybrid(args, config).await,
            Commands::Score(args) => score::execute(args, config).await,
            Commands::Artifacts(args) => artifacts::execute(args, config).await,
            Commands::Menu => Box::pin(crate::shell::run_shell(config)).await,
        }
    }
}
