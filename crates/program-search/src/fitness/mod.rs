//! Fitness scoring for candidate programs
//!
//! A score is the sum of an executability term (dominant), a timing bonus,
//! a structural complexity bonus and a size bonus. Execution failures never
//! escape the oracle; they are mapped to ordered partial credit.

mod executor;

#[cfg(test)]
mod tests;

pub use executor::{ExecutorConfig, PythonExecutor};

use crate::error::{SearchError, SearchResult};
use crate::structural::SourceFeatures;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Scores a candidate's source. Higher is better, never negative.
pub trait FitnessOracle: Send + Sync {
    /// Score `source`
    fn score(&self, source: &str) -> f64;
}

/// Classified result of running a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionOutcome {
    /// Ran to completion
    Success {
        /// Wall time spent executing
        elapsed: Duration,
    },
    /// Division-by-zero shaped failure that a repair could fix
    RecoverableFault {
        /// Interpreter message
        message: String,
    },
    /// Source failed to parse
    SyntaxFault {
        /// Interpreter message
        message: String,
    },
    /// Any other failure, including timeouts and sandbox errors
    OtherFault {
        /// Failure description
        message: String,
    },
}

impl ExecutionOutcome {
    /// Short label for reports
    pub fn label(&self) -> &'static str {
        match self {
            ExecutionOutcome::Success { .. } => "success",
            ExecutionOutcome::RecoverableFault { .. } => "division fault",
            ExecutionOutcome::SyntaxFault { .. } => "syntax fault",
            ExecutionOutcome::OtherFault { .. } => "other fault",
        }
    }

    /// Whether execution succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success { .. })
    }
}

/// Runs candidate source in isolation.
///
/// Implementations must return within a bounded time and must classify
/// every failure instead of propagating it.
pub trait CodeExecutor: Send + Sync {
    /// Execute `source` and classify what happened
    fn execute(&self, source: &str) -> ExecutionOutcome;
}

/// Scoring constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessConfig {
    /// Reward for a successful run
    pub success_reward: f64,
    /// Timing bonus for an instantaneous run
    pub timing_bonus_max: f64,
    /// Timing bonus lost per second of execution
    pub timing_penalty_per_second: f64,
    /// Credit for a division-by-zero failure
    pub division_fault_credit: f64,
    /// Credit for a syntax failure
    pub syntax_fault_credit: f64,
    /// Credit for any other failure
    pub other_fault_credit: f64,
    /// Bonus per top-level function unit
    pub function_weight: f64,
    /// Bonus per top-level container unit
    pub container_weight: f64,
    /// Inclusive non-blank line band that earns the size bonus
    pub length_band: (usize, usize),
    /// Size bonus
    pub length_bonus: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            success_reward: 100.0,
            timing_bonus_max: 20.0,
            timing_penalty_per_second: 100.0,
            division_fault_credit: 30.0,
            syntax_fault_credit: 20.0,
            other_fault_credit: 10.0,
            function_weight: 5.0,
            container_weight: 10.0,
            length_band: (20, 50),
            length_bonus: 10.0,
        }
    }
}

impl FitnessConfig {
    /// Validate weights and credit ordering
    pub fn validate(&self) -> SearchResult<()> {
        let weights = [
            self.success_reward,
            self.timing_bonus_max,
            self.timing_penalty_per_second,
            self.division_fault_credit,
            self.syntax_fault_credit,
            self.other_fault_credit,
            self.function_weight,
            self.container_weight,
            self.length_bonus,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SearchError::invalid_config(
                "Fitness weights must be finite and non-negative",
            ));
        }

        if !(self.success_reward > self.division_fault_credit
            && self.division_fault_credit > self.syntax_fault_credit
            && self.syntax_fault_credit > self.other_fault_credit)
        {
            return Err(SearchError::invalid_config(
                "Execution credits must be ordered success > division fault > syntax fault > other fault",
            ));
        }

        if self.length_band.0 > self.length_band.1 {
            return Err(SearchError::invalid_config(
                "Length band lower bound must not exceed upper bound",
            ));
        }

        Ok(())
    }

    /// Timing bonus for a run of `elapsed`, monotonically non-increasing
    pub fn timing_bonus(&self, elapsed: Duration) -> f64 {
        let lost = (elapsed.as_secs_f64() * self.timing_penalty_per_second).floor();
        (self.timing_bonus_max - lost).max(0.0)
    }
}

/// Per-component score of one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Classified execution result
    pub outcome: ExecutionOutcome,
    /// Success reward or partial credit
    pub execution: f64,
    /// Timing bonus (success only)
    pub timing: f64,
    /// Function and container bonus
    pub complexity: f64,
    /// Size band bonus
    pub size: f64,
    /// Measured features
    pub features: SourceFeatures,
}

impl ScoreBreakdown {
    /// Sum of all components, clamped at zero
    pub fn total(&self) -> f64 {
        (self.execution + self.timing + self.complexity + self.size).max(0.0)
    }
}

/// The fitness oracle used by every strategy: sandboxed execution plus
/// static structure heuristics
#[derive(Clone)]
pub struct ProgramFitness {
    config: FitnessConfig,
    executor: Arc<dyn CodeExecutor>,
}

impl std::fmt::Debug for ProgramFitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramFitness")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ProgramFitness {
    /// Create oracle over `executor`
    pub fn new(config: FitnessConfig, executor: Arc<dyn CodeExecutor>) -> SearchResult<Self> {
        config.validate()?;
        Ok(Self { config, executor })
    }

    /// Scoring constants
    pub fn config(&self) -> &FitnessConfig {
        &self.config
    }

    /// Score `source` component by component
    pub fn breakdown(&self, source: &str) -> ScoreBreakdown {
        let outcome = self.executor.execute(source);
        let (execution, timing) = match &outcome {
            ExecutionOutcome::Success { elapsed } => {
                (self.config.success_reward, self.config.timing_bonus(*elapsed))
            }
            ExecutionOutcome::RecoverableFault { .. } => (self.config.division_fault_credit, 0.0),
            ExecutionOutcome::SyntaxFault { .. } => (self.config.syntax_fault_credit, 0.0),
            ExecutionOutcome::OtherFault { .. } => (self.config.other_fault_credit, 0.0),
        };

        let features = SourceFeatures::of(source);
        let complexity = features.functions as f64 * self.config.function_weight
            + features.containers as f64 * self.config.container_weight;

        let (low, high) = self.config.length_band;
        let size = if (low..=high).contains(&features.lines) {
            self.config.length_bonus
        } else {
            0.0
        };

        ScoreBreakdown {
            outcome,
            execution,
            timing,
            complexity,
            size,
            features,
        }
    }
}

impl FitnessOracle for ProgramFitness {
    fn score(&self, source: &str) -> f64 {
        let breakdown = self.breakdown(source);
        tracing::trace!(
            outcome = breakdown.outcome.label(),
            total = breakdown.total(),
            "Scored candidate"
        );
        breakdown.total()
    }
}
