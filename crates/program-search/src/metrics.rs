//! Search metrics tracking

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Metrics for one strategy run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMetrics {
    /// Strategy that produced the run
    pub strategy: String,
    /// Generations, temperature steps or learning steps completed
    pub iterations: u64,
    /// Fitness oracle calls
    pub total_evaluations: u64,
    /// Fitness of the starting point (best of the first population for GA)
    pub initial_fitness: f64,
    /// Fitness of the reported best candidate
    pub best_fitness: f64,
    /// Wall time of the run
    pub elapsed_time: Duration,
    /// Strategy-specific counters
    pub custom_metrics: HashMap<String, f64>,
    /// Per-iteration history
    pub history: SearchHistory,
}

impl SearchMetrics {
    /// Empty metrics for `strategy`
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            iterations: 0,
            total_evaluations: 0,
            initial_fitness: 0.0,
            best_fitness: 0.0,
            elapsed_time: Duration::ZERO,
            custom_metrics: HashMap::new(),
            history: SearchHistory::default(),
        }
    }

    /// Improvement of the best fitness over the starting point
    pub fn improvement(&self) -> f64 {
        self.best_fitness - self.initial_fitness
    }

    /// Custom counter, `0.0` when never recorded
    pub fn custom(&self, name: &str) -> f64 {
        self.custom_metrics.get(name).copied().unwrap_or(0.0)
    }
}

/// Per-iteration history
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchHistory {
    /// Best fitness after each iteration
    pub best_fitness_history: Vec<f64>,
    /// Average population fitness per generation (GA only)
    pub average_fitness_history: Vec<f64>,
    /// Iteration durations
    pub iteration_times: Vec<Duration>,
}

impl SearchHistory {
    /// Whether the best fitness never decreased
    pub fn is_monotonic(&self) -> bool {
        self.best_fitness_history.windows(2).all(|w| w[1] >= w[0])
    }
}

/// Collects metrics while a strategy runs
#[derive(Debug)]
pub struct MetricsCollector {
    start_time: Instant,
    iteration_start: Instant,
    metrics: SearchMetrics,
}

impl MetricsCollector {
    /// Start collecting for `strategy`
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            iteration_start: Instant::now(),
            metrics: SearchMetrics::new(strategy),
        }
    }

    /// Record the starting point's fitness
    pub fn set_initial_fitness(&mut self, fitness: f64) {
        self.metrics.initial_fitness = fitness;
        self.metrics.best_fitness = fitness;
    }

    /// Count one oracle call
    pub fn record_evaluation(&mut self) {
        self.metrics.total_evaluations += 1;
    }

    /// Mark the start of an iteration
    pub fn start_iteration(&mut self) {
        self.iteration_start = Instant::now();
    }

    /// Close an iteration with the best fitness seen so far
    pub fn end_iteration(&mut self, best_fitness: f64, average_fitness: Option<f64>) {
        self.metrics.iterations += 1;
        self.metrics.best_fitness = best_fitness;
        self.metrics
            .history
            .best_fitness_history
            .push(best_fitness);
        if let Some(average) = average_fitness {
            self.metrics.history.average_fitness_history.push(average);
        }
        self.metrics
            .history
            .iteration_times
            .push(self.iteration_start.elapsed());
    }

    /// Add to a custom counter
    pub fn increment(&mut self, name: &str, amount: f64) {
        *self
            .metrics
            .custom_metrics
            .entry(name.to_string())
            .or_insert(0.0) += amount;
    }

    /// Set a custom metric
    pub fn add_custom_metric(&mut self, name: &str, value: f64) {
        self.metrics.custom_metrics.insert(name.to_string(), value);
    }

    /// Current metrics
    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    /// Stop the clock and hand back the metrics
    pub fn finish(mut self, best_fitness: f64) -> SearchMetrics {
        self.metrics.best_fitness = best_fitness;
        self.metrics.elapsed_time = self.start_time.elapsed();
        self.metrics
    }
}
