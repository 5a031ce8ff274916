//! Artifact inspection commands

use crate::config::CliConfig;
use crate::{output, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use program_search::store::ArtifactMetadata;
use program_search::{ArtifactSelector, ArtifactStore, FileArtifactStore};

#[derive(Debug, Clone, Args)]
pub struct ArtifactsArgs {
    #[command(subcommand)]
    pub command: ArtifactsCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ArtifactsCommand {
    /// List saved artifacts, newest first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one artifact
    Show {
        /// `latest`, a list index, an id or a label
        #[arg(default_value = "latest")]
        selector: ArtifactSelector,

        /// Print only the source text
        #[arg(long)]
        source_only: bool,
    },
}

fn row(index: usize, artifact: &ArtifactMetadata) -> String {
    format!(
        "{:>3}  {:<24} {:>8.2}  {}  {}",
        index,
        artifact.label,
        artifact.fitness,
        artifact.created_at.format("%Y-%m-%d %H:%M:%S"),
        &artifact.id.simple().to_string()[..8]
    )
}

pub async fn execute(args: ArtifactsArgs, config: &CliConfig) -> Result<()> {
    let store = FileArtifactStore::new(&config.artifact_dir);

    match args.command {
        ArtifactsCommand::List { json } => {
            let artifacts = store.list().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&artifacts)?);
                return Ok(());
            }
            if artifacts.is_empty() {
                output::info(&format!(
                    "No saved artifacts in {}",
                    store.root().display()
                ));
                return Ok(());
            }

            output::header(&format!("Artifacts in {}", store.root().display()));
            println!(
                "{}",
                format!(
                    "{:>3}  {:<24} {:>8}  {:<19}  {}",
                    "#", "LABEL", "FITNESS", "CREATED", "ID"
                )
                .bold()
            );
            for (index, artifact) in artifacts.iter().enumerate() {
                println!("{}", row(index, artifact));
            }
        }
        ArtifactsCommand::Show {
            selector,
            source_only,
        } => {
            let artifact = store.load(&selector).await?;
            if source_only {
                print!("{}", artifact.source);
                return Ok(());
            }

            output::header(&format!("Artifact {}", artifact.metadata.label));
            output::kv("Id", &artifact.metadata.id.to_string());
            output::kv("Fitness", &format!("{:.2}", artifact.metadata.fitness));
            output::kv("Created", &artifact.metadata.created_at.to_rfc3339());
            output::kv("File", &artifact.metadata.location.display().to_string());
            output::header("Source");
            output::source(&artifact.source);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> CliConfig {
        CliConfig {
            artifact_dir: dir.path().to_path_buf(),
            ..CliConfig::default()
        }
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let dir = TempDir::new().unwrap();
        let args = ArtifactsArgs {
            command: ArtifactsCommand::List { json: false },
        };
        assert!(execute(args, &config(&dir)).await.is_ok());
    }

    #[tokio::test]
    async fn test_show_missing_artifact_fails() {
        let dir = TempDir::new().unwrap();
        let args = ArtifactsArgs {
            command: ArtifactsCommand::Show {
                selector: ArtifactSelector::Latest,
                source_only: false,
            },
        };
        assert!(execute(args, &config(&dir)).await.is_err());
    }

    #[tokio::test]
    async fn test_show_saved_artifact() {
        let dir = TempDir::new().unwrap();
        let store = FileArtifactStore::new(dir.path());
        let saved = store
            .save("def f():\n    return 1\n", "keeper", 42.0)
            .await
            .unwrap();

        let line = row(0, &saved);
        assert!(line.contains("keeper"));
        assert!(line.contains("42.00"));

        let args = ArtifactsArgs {
            command: ArtifactsCommand::Show {
                selector: "keeper".parse().unwrap(),
                source_only: true,
            },
        };
        assert!(execute(args, &config(&dir)).await.is_ok());
    }
}
