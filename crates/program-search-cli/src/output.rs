//! Output formatting utilities for the CLI

use colored::Colorize;
use console::{style, Emoji};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

static INFO: Emoji = Emoji("ℹ️ ", "");
static SUCCESS: Emoji = Emoji("✅", "✓");
static WARNING: Emoji = Emoji("⚠️ ", "!");
static ERROR: Emoji = Emoji("❌", "x");
static SEARCH: Emoji = Emoji("🧬", ">>");

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style(INFO).blue(), message);
}

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style(SUCCESS).green(), message.green());
}

/// Print a warning message
pub fn warn(message: &str) {
    eprintln!("{} {}", style(WARNING).yellow(), message.yellow());
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style(ERROR).red(), message.red());
}

/// Print a banner line
pub fn banner(message: &str) {
    println!("{} {}", style(SEARCH).cyan(), message.cyan().bold());
}

/// Print a header
pub fn header(title: &str) {
    println!("\n{}\n", title.bold().underline());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("{}: {}", key.bold(), value);
}

/// Print a bullet point
pub fn bullet(message: &str) {
    println!("  • {}", message);
}

/// Print program source in a dimmed block
pub fn source(text: &str) {
    for line in text.lines() {
        println!("  {}", line.dimmed());
    }
}

/// Fitness value, green when it gained over `baseline`
pub fn fitness(value: f64, baseline: f64) -> String {
    let text = format!("{:.2}", value);
    if value > baseline {
        text.green().bold().to_string()
    } else {
        text.bold().to_string()
    }
}

/// Signed fitness change
pub fn delta(value: f64) -> String {
    let text = format!("{:+.2}", value);
    if value > 0.0 {
        text.green().to_string()
    } else if value < 0.0 {
        text.red().to_string()
    } else {
        text
    }
}

/// Spinner shown while a blocking search runs; hidden for machine output
pub fn spinner(message: &str, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
