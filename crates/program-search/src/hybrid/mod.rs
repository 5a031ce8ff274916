//! Hybrid pipeline chaining the three strategies
//!
//! Genetic search explores broadly, annealing refines its winner, and
//! Q-learning explores structurally around the annealed result.

mod config;
mod performance;
mod system;

#[cfg(test)]
mod tests;

pub use config::HybridConfig;
pub use performance::PhaseReport;
pub use system::{HybridOrchestrator, HybridOutcome};
