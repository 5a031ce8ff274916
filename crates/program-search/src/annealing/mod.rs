//! Simulated annealing over a single candidate trajectory

pub use self::annealer::{acceptance_probability, Annealer};
pub use self::config::AnnealingConfig;

mod annealer;
mod config;
