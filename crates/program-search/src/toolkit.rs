//! Collaborators shared by every search strategy

use crate::candidate::Candidate;
use crate::error::SearchResult;
use crate::fitness::{ExecutorConfig, FitnessConfig, FitnessOracle, ProgramFitness, PythonExecutor};
use crate::generator::{GeneratorConfig, ProgramGenerator, PythonProgramGenerator};
use crate::improvement::{improve_or_original, CodeImprover, IdentityImprover};
use crate::structural::{SyntaxValidator, ValidityCheck};
use std::fmt;
use std::sync::Arc;

/// Oracle, generator, validity check and improver used by a run
#[derive(Clone)]
pub struct SearchToolkit {
    /// Scores candidates
    pub oracle: Arc<dyn FitnessOracle>,
    /// Synthesizes fresh source
    pub generator: Arc<dyn ProgramGenerator>,
    /// Rejects corrupt transitions
    pub validator: Arc<dyn ValidityCheck>,
    /// Optional post-search rewrite
    pub improver: Arc<dyn CodeImprover>,
}

impl SearchToolkit {
    /// Toolkit with the static validator and no improvement
    pub fn new(oracle: Arc<dyn FitnessOracle>, generator: Arc<dyn ProgramGenerator>) -> Self {
        Self {
            oracle,
            generator,
            validator: Arc::new(SyntaxValidator),
            improver: Arc::new(IdentityImprover),
        }
    }

    /// Interpreter-backed toolkit
    pub fn python(
        fitness: FitnessConfig,
        executor: ExecutorConfig,
        generator: GeneratorConfig,
    ) -> SearchResult<Self> {
        let executor = Arc::new(PythonExecutor::new(executor));
        let oracle = ProgramFitness::new(fitness, executor)?;
        let generator = PythonProgramGenerator::new(generator)?;
        Ok(Self::new(Arc::new(oracle), Arc::new(generator)))
    }

    /// Replace the validity check
    pub fn with_validator(mut self, validator: Arc<dyn ValidityCheck>) -> Self {
        self.validator = validator;
        self
    }

    /// Replace the improver
    pub fn with_improver(mut self, improver: Arc<dyn CodeImprover>) -> Self {
        self.improver = improver;
        self
    }

    /// Run the improver over `candidate` and score the result.
    ///
    /// Returns the candidate unchanged (fitness kept) when the improver fails
    /// or leaves the source as is.
    pub fn enhance(&self, candidate: &Candidate) -> Candidate {
        let improved = improve_or_original(self.improver.as_ref(), candidate.source());
        let mut enhanced = candidate.derive(improved);
        if enhanced.evaluate(self.oracle.as_ref()) {
            tracing::info!(
                "Enhanced result scored {:.2} (was {:.2})",
                enhanced.fitness(),
                candidate.fitness()
            );
        }
        enhanced
    }
}

impl fmt::Debug for SearchToolkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchToolkit").finish_non_exhaustive()
    }
}
