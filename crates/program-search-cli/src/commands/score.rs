//! Score command implementation

use crate::config::CliConfig;
use crate::{output, Result};
use clap::Args;
use program_search::fitness::{ExecutionOutcome, PythonExecutor, ScoreBreakdown};
use program_search::ProgramFitness;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Args)]
pub struct ScoreArgs {
    /// Source file to score
    pub file: PathBuf,

    /// Print a JSON report instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ScoreReport<'a> {
    file: &'a PathBuf,
    total: f64,
    breakdown: &'a ScoreBreakdown,
}

/// Execute and score `source` with the configured interpreter
pub async fn score_source(source: String, config: &CliConfig) -> Result<ScoreBreakdown> {
    let search = config.search_config();
    let oracle = ProgramFitness::new(
        search.fitness,
        Arc::new(PythonExecutor::new(search.executor)),
    )?;
    Ok(tokio::task::spawn_blocking(move || oracle.breakdown(&source)).await?)
}

fn outcome_detail(outcome: &ExecutionOutcome) -> String {
    match outcome {
        ExecutionOutcome::Success { elapsed } => format!("ran in {:.2?}", elapsed),
        ExecutionOutcome::RecoverableFault { message }
        | ExecutionOutcome::SyntaxFault { message }
        | ExecutionOutcome::OtherFault { message } => message.clone(),
    }
}

pub async fn execute(args: ScoreArgs, config: &CliConfig) -> Result<()> {
    let source = tokio::fs::read_to_string(&args.file).await?;
    let breakdown = score_source(source, config).await?;

    if args.json {
        let report = ScoreReport {
            file: &args.file,
            total: breakdown.total(),
            breakdown: &breakdown,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::header(&format!("Score for {}", args.file.display()));
    output::kv("Outcome", breakdown.outcome.label());
    let detail = outcome_detail(&breakdown.outcome);
    if !detail.is_empty() {
        output::bullet(&detail);
    }
    output::kv("Execution", &format!("{:.2}", breakdown.execution));
    output::kv("Timing bonus", &format!("{:.2}", breakdown.timing));
    output::kv(
        "Structure",
        &format!(
            "{:.2} ({} functions, {} classes)",
            breakdown.complexity, breakdown.features.functions, breakdown.features.containers
        ),
    );
    output::kv(
        "Size",
        &format!("{:.2} ({} lines)", breakdown.size, breakdown.features.lines),
    );
    output::kv("Total", &output::fitness(breakdown.total(), 0.0));
    Ok(())
}
