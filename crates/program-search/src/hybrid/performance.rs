//! Per-phase reporting for the hybrid pipeline

use crate::metrics::SearchMetrics;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What one phase of the pipeline achieved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseReport {
    /// Strategy name
    pub strategy: String,
    /// Fitness the phase started from
    pub start_fitness: f64,
    /// Fitness of the phase's best candidate
    pub best_fitness: f64,
    /// Oracle calls made by the phase
    pub evaluations: u64,
    /// Wall time of the phase
    pub elapsed: Duration,
}

impl PhaseReport {
    /// Build from a phase's metrics
    pub fn from_metrics(metrics: &SearchMetrics) -> Self {
        Self {
            strategy: metrics.strategy.clone(),
            start_fitness: metrics.initial_fitness,
            best_fitness: metrics.best_fitness,
            evaluations: metrics.total_evaluations,
            elapsed: metrics.elapsed_time,
        }
    }

    /// Fitness gained within the phase
    pub fn improvement(&self) -> f64 {
        self.best_fitness - self.start_fitness
    }
}
