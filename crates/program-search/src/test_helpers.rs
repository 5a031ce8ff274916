//! Shared fixtures for unit tests

use crate::fitness::{
    CodeExecutor, ExecutionOutcome, FitnessConfig, FitnessOracle, ProgramFitness,
};
use crate::generator::PythonProgramGenerator;
use crate::toolkit::SearchToolkit;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Scores by byte length
pub struct LengthOracle;

impl FitnessOracle for LengthOracle {
    fn score(&self, source: &str) -> f64 {
        source.len() as f64
    }
}

/// Wraps an oracle and counts calls
pub struct CountingOracle<O> {
    pub inner: O,
    pub calls: AtomicUsize,
}

impl<O> CountingOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<O: FitnessOracle> FitnessOracle for CountingOracle<O> {
    fn score(&self, source: &str) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.score(source)
    }
}

/// Executor that always reports an instantaneous success
pub struct InstantSuccess;

impl CodeExecutor for InstantSuccess {
    fn execute(&self, _source: &str) -> ExecutionOutcome {
        ExecutionOutcome::Success {
            elapsed: Duration::ZERO,
        }
    }
}

/// Interpreter-free fitness: real scoring rules, every run succeeds
pub fn structural_oracle() -> ProgramFitness {
    ProgramFitness::new(FitnessConfig::default(), Arc::new(InstantSuccess))
        .expect("default fitness config is valid")
}

/// Toolkit with the real generator and the given oracle
pub fn fixed_toolkit(oracle: Arc<dyn FitnessOracle>) -> SearchToolkit {
    SearchToolkit::new(oracle, Arc::new(PythonProgramGenerator::default()))
}

/// Toolkit scored by [`structural_oracle`]
pub fn structural_toolkit() -> SearchToolkit {
    fixed_toolkit(Arc::new(structural_oracle()))
}
