//! Tabular Q-learning over discretized program states
//!
//! The learner never looks at source text directly: each candidate is
//! reduced to a [`SearchState`] and the policy is a sparse [`QTable`] over
//! `(state, action)` pairs with a fixed [`Action`] set.

pub use self::action::Action;
pub use self::agent::QLearner;
pub use self::config::QLearningConfig;
pub use self::state::{discretize, SearchState};
pub use self::table::QTable;

mod action;
mod agent;
mod config;
mod state;
mod table;

#[cfg(test)]
mod tests;
