//! Random program synthesis
//!
//! The search strategies never invent source text themselves; whenever they
//! need fresh material (initial population, crossover fallback, mutation)
//! they ask a [`ProgramGenerator`].

mod python;

pub use python::{GeneratorConfig, PythonProgramGenerator};

use crate::error::SearchResult;
use rand::RngCore;

/// Minimal program used when a generator cannot produce anything
pub const FALLBACK_PROGRAM: &str = "# fallback program\n\ndef fallback():\n    return 0\n";

/// Source of fresh, syntactically valid candidate text
pub trait ProgramGenerator: Send + Sync {
    /// A complete program
    fn program(&self, rng: &mut dyn RngCore) -> SearchResult<String>;

    /// A single top-level function unit
    fn function(&self, rng: &mut dyn RngCore) -> SearchResult<String>;

    /// A single top-level container unit
    fn container(&self, rng: &mut dyn RngCore) -> SearchResult<String>;
}

/// Synthesize a program, degrading to [`FALLBACK_PROGRAM`] on failure
pub fn program_or_fallback(generator: &dyn ProgramGenerator, rng: &mut dyn RngCore) -> String {
    generator.program(rng).unwrap_or_else(|e| {
        tracing::warn!("Program synthesis failed, using fallback program: {}", e);
        FALLBACK_PROGRAM.to_string()
    })
}
