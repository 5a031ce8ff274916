//! Mutation operator shared by every strategy

use crate::candidate::Candidate;
use crate::generator::ProgramGenerator;
use crate::structural::{append_unit, extract_units, replace_unit};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Edits the mutation operator can make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    /// Append a freshly synthesized function unit
    AddFunction,
    /// Append a freshly synthesized container unit
    AddContainer,
    /// Swap one existing function unit for a fresh one
    ReplaceFunction,
}

impl MutationKind {
    /// Every kind, in selection order
    pub const ALL: [MutationKind; 3] = [
        MutationKind::AddFunction,
        MutationKind::AddContainer,
        MutationKind::ReplaceFunction,
    ];
}

/// Apply one specific edit. Returns `None` when the edit cannot be made
/// (no function to replace, generator failure).
pub fn apply_mutation(
    source: &str,
    kind: MutationKind,
    rng: &mut dyn RngCore,
    generator: &dyn ProgramGenerator,
) -> Option<String> {
    let fresh = match kind {
        MutationKind::AddFunction | MutationKind::ReplaceFunction => generator.function(rng),
        MutationKind::AddContainer => generator.container(rng),
    };
    let fresh = match fresh {
        Ok(unit) => unit,
        Err(e) => {
            tracing::warn!("Mutation {:?} skipped, synthesis failed: {}", kind, e);
            return None;
        }
    };

    match kind {
        MutationKind::AddFunction | MutationKind::AddContainer => {
            Some(append_unit(source, &fresh))
        }
        MutationKind::ReplaceFunction => {
            let units = extract_units(source);
            let old = units.functions.choose(&mut *rng)?;
            Some(replace_unit(source, old, &fresh))
        }
    }
}

/// With probability `rate`, apply a uniformly chosen [`MutationKind`].
///
/// Always returns a new candidate owning its own source; it is an exact
/// copy (fitness kept) when no edit happened.
pub fn mutate(
    candidate: &Candidate,
    rate: f64,
    rng: &mut dyn RngCore,
    generator: &dyn ProgramGenerator,
) -> Candidate {
    if !rng.gen_bool(rate.clamp(0.0, 1.0)) {
        return candidate.clone();
    }

    let kind = MutationKind::ALL[rng.gen_range(0..MutationKind::ALL.len())];
    match apply_mutation(candidate.source(), kind, rng, generator) {
        Some(source) => candidate.derive(source),
        None => candidate.clone(),
    }
}
