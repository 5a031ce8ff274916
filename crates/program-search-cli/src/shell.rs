//! Interactive menu for the program-search CLI

use crate::config::CliConfig;
use crate::{commands::Commands, output, CliError, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{error::ReadlineError, history::FileHistory, Editor};
use rustyline_derive::Helper;

const COMMANDS: [&str; 11] = [
    "generate",
    "evolve",
    "anneal",
    "learn",
    "hybrid",
    "score",
    "artifacts",
    "help",
    "clear",
    "exit",
    "quit",
];

/// Numbered menu entries and the command line each one runs
const MENU: [(&str, &str, &str); 6] = [
    ("1", "generate", "Generate a random program"),
    ("2", "evolve", "Genetic search"),
    ("3", "anneal", "Simulated annealing"),
    ("4", "learn", "Q-learning"),
    ("5", "hybrid", "Genetic, then annealing, then Q-learning"),
    ("6", "artifacts list", "List saved programs"),
];

#[derive(Helper)]
struct ShellHelper {
    completer: FilenameCompleter,
    commands: Vec<String>,
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let words: Vec<&str> = line.split_whitespace().collect();

        if words.is_empty() || (words.len() == 1 && !line.ends_with(' ')) {
            let prefix = words.first().copied().unwrap_or("");
            let matches: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(prefix))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();

            if !matches.is_empty() {
                return Ok((0, matches));
            }
        }

        // seed files and score targets
        self.completer.complete(line, pos, ctx)
    }
}

impl Highlighter for ShellHelper {}
impl Hinter for ShellHelper {
    type Hint = String;
}
impl Validator for ShellHelper {}

pub async fn run_shell(config: &CliConfig) -> Result<()> {
    output::banner("program-search interactive menu");
    output::info("Pick a number or type a command; 'help' lists options, 'exit' quits\n");
    print_menu();

    let helper = ShellHelper {
        completer: FilenameCompleter::new(),
        commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
    };

    let history_path = dirs::cache_dir()
        .map(|p| p.join("program-search").join("history.txt"))
        .unwrap_or_else(|| ".program_search_history".into());

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let mut rl: Editor<ShellHelper, FileHistory> = Editor::new()?;
    rl.set_helper(Some(helper));

    if rl.load_history(&history_path).is_err() {
        tracing::debug!("No previous history at {}", history_path.display());
    }

    let prompt = format!("{} ", "program-search>".green().bold());

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line)?;

                match line {
                    "exit" | "quit" => {
                        output::info("Goodbye!");
                        break;
                    }
                    "clear" => {
                        print!("\x1B[2J\x1B[1;1H");
                    }
                    "help" => {
                        print_shell_help();
                    }
                    _ => {
                        if let Err(e) = execute_shell_command(line, config).await {
                            output::error(&format!("Error: {}", e));
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                output::info("Use 'exit' to quit");
            }
            Err(ReadlineError::Eof) => {
                output::info("Goodbye!");
                break;
            }
            Err(err) => {
                output::error(&format!("Error: {}", err));
                break;
            }
        }
    }

    rl.save_history(&history_path).ok();
    Ok(())
}

/// Expand a menu number into its command line
fn expand_shortcut(line: &str) -> &str {
    MENU.iter()
        .find(|(key, _, _)| *key == line)
        .map(|(_, command, _)| *command)
        .unwrap_or(line)
}

async fn execute_shell_command(line: &str, config: &CliConfig) -> Result<()> {
    let line = expand_shortcut(line);
    let args: Vec<&str> = line.split_whitespace().collect();
    if args.is_empty() {
        return Ok(());
    }

    let mut full_args = vec!["program-search"];
    full_args.extend(args.iter().copied());

    match parse_command(&full_args)? {
        Commands::Menu => Err(CliError::Command(
            "Already in the interactive menu".to_string(),
        )),
        command => command.execute(config).await,
    }
}

fn parse_command(args: &[&str]) -> Result<Commands> {
    #[derive(Debug, Parser)]
    struct ShellCli {
        #[command(subcommand)]
        command: Commands,
    }

    ShellCli::try_parse_from(args)
        .map(|cli| cli.command)
        .map_err(|e| CliError::Command(e.to_string()))
}

fn print_menu() {
    for (key, _, description) in MENU {
        println!("  {} {}", format!("{})", key).cyan().bold(), description);
    }
    println!();
}

fn print_shell_help() {
    output::header("program-search interactive menu");

    println!("{}", "Menu:".bold());
    print_menu();

    println!("{}", "Commands:".bold());
    println!();

    output::bullet("generate [--seed N]        - Print a random program");
    output::bullet("evolve [options]           - Genetic search");
    output::bullet("anneal [options]           - Simulated annealing");
    output::bullet("learn [options]            - Q-learning");
    output::bullet("hybrid [options]           - All three strategies in sequence");
    output::bullet("score <file>               - Score a source file");
    output::bullet("artifacts list|show [sel]  - Inspect saved programs");
    output::bullet("clear                      - Clear the screen");
    output::bullet("help                       - Show this help message");
    output::bullet("exit, quit                 - Leave the menu");

    println!();
    println!("{}", "Examples:".bold());
    println!();

    output::bullet("evolve --population 20 --generations 10 --save best-ga");
    output::bullet("anneal --seed-file program.py --temperature 50");
    output::bullet("learn --episodes 20 --enhance");
    output::bullet("hybrid --seed 7 --json");
    output::bullet("artifacts show latest");

    println!();
    println!("{}", "Tips:".bold());
    output::bullet("Use Tab for command and filename completion");
    output::bullet("Commands accept the same options as the CLI");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_helper_creation() {
        let helper = ShellHelper {
            completer: FilenameCompleter::new(),
            commands: vec!["generate".to_string()],
        };

        assert_eq!(helper.commands.len(), 1);
    }

    #[test]
    fn test_parse_command() {
        let result = parse_command(&["program-search", "evolve", "--population", "4"]);
        assert!(matches!(result, Ok(Commands::Evolve(_))));

        let result = parse_command(&["program-search", "invalid"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_menu_shortcuts() {
        assert_eq!(expand_shortcut("1"), "generate");
        assert_eq!(expand_shortcut("6"), "artifacts list");
        assert_eq!(expand_shortcut("score a.py"), "score a.py");

        for (_, command, _) in MENU {
            let mut args = vec!["program-search"];
            args.extend(command.split_whitespace());
            assert!(parse_command(&args).is_ok(), "{}", command);
        }
    }

    #[tokio::test]
    async fn test_nested_menu_is_rejected() {
        let result = execute_shell_command("menu", &CliConfig::default()).await;
        assert!(matches!(result, Err(CliError::Command(_))));
    }

    #[test]
    fn test_print_shell_help() {
        // Should not panic
        print_shell_help();
    }
}
