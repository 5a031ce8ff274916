//! Generate command implementation

use crate::config::CliConfig;
use crate::Result;
use clap::Args;
use program_search::generator::{program_or_fallback, GeneratorConfig, PythonProgramGenerator};
use program_search::traits::seeded_rng;

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Random seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Top-level functions per program
    #[arg(long)]
    pub functions: Option<usize>,

    /// Classes per program
    #[arg(long)]
    pub classes: Option<usize>,
}

impl GenerateArgs {
    fn generator_config(&self) -> GeneratorConfig {
        let mut config = GeneratorConfig::default();
        if let Some(functions) = self.functions {
            config.functions_per_program = functions;
        }
        if let Some(classes) = self.classes {
            config.containers_per_program = classes;
        }
        config
    }
}

/// Synthesize one program as text
pub fn render(args: &GenerateArgs, config: &CliConfig) -> Result<String> {
    let generator = PythonProgramGenerator::new(args.generator_config())?;
    let mut rng = seeded_rng(args.seed.or(config.seed));
    Ok(program_or_fallback(&generator, &mut rng))
}

pub async fn execute(args: GenerateArgs, config: &CliConfig) -> Result<()> {
    let program = render(&args, config)?;
    print!("{}", program);
    if !program.ends_with('\n') {
        println!();
    }
    Ok(())
}
