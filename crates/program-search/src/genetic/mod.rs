//! Generational genetic search
//!
//! Tournament selection, unit-level crossover, mutation and generational
//! replacement with elitism over a fixed-size population.

pub use self::config::EvolutionConfig;
pub use self::engine::GeneticEngine;

mod config;
mod engine;
