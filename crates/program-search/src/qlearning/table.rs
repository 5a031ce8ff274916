//! Sparse Q-value table

use super::action::Action;
use super::state::SearchState;
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from `(state, action)` to a value estimate; unseen pairs read as 0
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    values: HashMap<(SearchState, Action), f64>,
}

impl QTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been learned yet
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of `(state, action)`
    pub fn get(&self, state: SearchState, action: Action) -> f64 {
        self.values.get(&(state, action)).copied().unwrap_or(0.0)
    }

    /// Highest value over all actions in `state`
    pub fn max_value(&self, state: SearchState) -> f64 {
        Action::ALL
            .iter()
            .map(|a| self.get(state, *a))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Every action attaining [`QTable::max_value`]
    pub fn best_actions(&self, state: SearchState) -> Vec<Action> {
        let best = self.max_value(state);
        Action::ALL
            .iter()
            .copied()
            .filter(|a| self.get(state, *a) == best)
            .collect()
    }

    /// Greedy action, ties broken uniformly at random
    pub fn greedy_action(&self, state: SearchState, rng: &mut dyn RngCore) -> Action {
        self.best_actions(state)
            .choose(&mut *rng)
            .copied()
            .unwrap_or(Action::NoOp)
    }

    /// Temporal-difference value of `(state, action)` after observing
    /// `reward` and `next_state`, without touching the table
    pub fn target_value(
        &self,
        state: SearchState,
        action: Action,
        reward: f64,
        next_state: SearchState,
        learning_rate: f64,
        discount: f64,
    ) -> f64 {
        let current = self.get(state, action);
        let target = reward + discount * self.max_value(next_state);
        current + learning_rate * (target - current)
    }

    /// Table after one Q-learning update
    pub fn updated(
        mut self,
        state: SearchState,
        action: Action,
        reward: f64,
        next_state: SearchState,
        learning_rate: f64,
        discount: f64,
    ) -> Self {
        self.update(state, action, reward, next_state, learning_rate, discount);
        self
    }

    /// In-place Q-learning update; returns the new value
    pub fn update(
        &mut self,
        state: SearchState,
        action: Action,
        reward: f64,
        next_state: SearchState,
        learning_rate: f64,
        discount: f64,
    ) -> f64 {
        let value =
            self.target_value(state, action, reward, next_state, learning_rate, discount);
        self.values.insert((state, action), value);
        value
    }
}
