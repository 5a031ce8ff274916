//! Structural edits available to the learner

use crate::candidate::Candidate;
use crate::mutation::mutate;
use crate::structural::{append_unit, extract_units, remove_unit, replace_random_operator};
use crate::toolkit::SearchToolkit;
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed action set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    /// Append a fresh function unit
    AddUnit,
    /// Remove a random function unit
    RemoveUnit,
    /// Append a fresh container unit
    AddContainer,
    /// Remove a random container unit
    RemoveContainer,
    /// Swap one arithmetic operator
    PerturbOperator,
    /// The genetic mutation operator
    GenericMutate,
    /// Leave the candidate as is
    NoOp,
}

impl Action {
    /// Every action, in table order
    pub const ALL: [Action; 7] = [
        Action::AddUnit,
        Action::RemoveUnit,
        Action::AddContainer,
        Action::RemoveContainer,
        Action::PerturbOperator,
        Action::GenericMutate,
        Action::NoOp,
    ];

    /// Apply the edit, returning a new candidate.
    ///
    /// Edits that cannot be made (nothing to remove, synthesis failure)
    /// return an exact copy of `current`.
    pub fn apply(
        self,
        current: &Candidate,
        toolkit: &SearchToolkit,
        mutation_rate: f64,
        rng: &mut dyn RngCore,
    ) -> Candidate {
        let source = current.source();
        let edited = match self {
            Action::AddUnit => toolkit
                .generator
                .function(rng)
                .map(|unit| append_unit(source, &unit))
                .ok(),
            Action::AddContainer => toolkit
                .generator
                .container(rng)
                .map(|unit| append_unit(source, &unit))
                .ok(),
            Action::RemoveUnit => extract_units(source)
                .functions
                .choose(&mut *rng)
                .map(|unit| remove_unit(source, unit)),
            Action::RemoveContainer => extract_units(source)
                .containers
                .choose(&mut *rng)
                .map(|unit| remove_unit(source, unit)),
            Action::PerturbOperator => Some(replace_random_operator(source, rng)),
            Action::GenericMutate => {
                return mutate(current, mutation_rate, rng, toolkit.generator.as_ref())
            }
            Action::NoOp => None,
        };

        match edited {
            Some(edited) => current.derive(edited),
            None => current.clone(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::AddUnit => "add-unit",
            Action::RemoveUnit => "remove-unit",
            Action::AddContainer => "add-container",
            Action::RemoveContainer => "remove-container",
            Action::PerturbOperator => "perturb-operator",
            Action::GenericMutate => "generic-mutate",
            Action::NoOp => "no-op",
        };
        f.write_str(name)
    }
}
