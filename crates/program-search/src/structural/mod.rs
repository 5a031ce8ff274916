//! Structural operations on candidate source text
//!
//! Sources are treated as a flat sequence of top-level blocks. A block starts
//! at a column-zero `def`/`async def` (function unit) or `class` (container
//! unit) header and runs through every following line that is blank or
//! indented. Column-zero `@` decorator lines directly above a header belong
//! to its block; any other column-zero line, comments included, ends it.
//! Extraction always returns verbatim slices of the input, so removing or
//! replacing an extracted unit edits exactly that text.

mod validator;


pub use validator::{SyntaxValidator, ValidityCheck};

use crate::generator::ProgramGenerator;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Header written at the top of every crossover child
pub const CROSSOVER_HEADER: &str = "# program recombined by crossover\n\n";

/// Infix operators eligible for perturbation
pub const ARITHMETIC_OPERATORS: [&str; 5] = ["+", "-", "*", "//", "%"];

/// Kind of a top-level block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// `def` / `async def`
    Function,
    /// `class`
    Container,
}

/// Function and container units of one source, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedUnits {
    /// Top-level function blocks
    pub functions: Vec<String>,
    /// Top-level container blocks
    pub containers: Vec<String>,
}

impl ExtractedUnits {
    /// Units of the given kind
    pub fn of_kind(&self, kind: UnitKind) -> &[String] {
        match kind {
            UnitKind::Function => &self.functions,
            UnitKind::Container => &self.containers,
        }
    }

    /// Total number of units
    pub fn len(&self) -> usize {
        self.functions.len() + self.containers.len()
    }

    /// Whether no unit was found
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counts consumed by fitness scoring and state discretization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceFeatures {
    /// Top-level function units
    pub functions: usize,
    /// Top-level container units
    pub containers: usize,
    /// Non-blank lines
    pub lines: usize,
}

impl SourceFeatures {
    /// Measure `source`
    pub fn of(source: &str) -> Self {
        let mut features = Self {
            lines: non_blank_lines(source),
            ..Self::default()
        };
        for (kind, _) in block_spans(source) {
            match kind {
                UnitKind::Function => features.functions += 1,
                UnitKind::Container => features.containers += 1,
            }
        }
        features
    }
}

/// Number of lines containing something other than whitespace
pub fn non_blank_lines(source: &str) -> usize {
    source.lines().filter(|line| !line.trim().is_empty()).count()
}

fn header_kind(line: &str) -> Option<UnitKind> {
    if line.starts_with("def ") || line.starts_with("async def ") {
        Some(UnitKind::Function)
    } else if line.starts_with("class ") {
        Some(UnitKind::Container)
    } else {
        None
    }
}

/// Byte ranges of every top-level block, in source order
fn block_spans(source: &str) -> Vec<(UnitKind, Range<usize>)> {
    let mut spans = Vec::new();
    let mut open: Option<(UnitKind, usize, usize)> = None;
    let mut decorated_from: Option<usize> = None;
    let mut offset = 0;

    for raw in source.split_inclusive('\n') {
        let start = offset;
        offset += raw.len();
        let line = raw.trim_end_matches(['\n', '\r']);

        if line.trim().is_empty() {
            continue;
        }

        let indented = line.starts_with(' ') || line.starts_with('\t');
        if indented {
            if let Some((_, _, end)) = open.as_mut() {
                *end = start + line.len();
            }
            continue;
        }

        if let Some((kind, block_start, end)) = open.take() {
            spans.push((kind, block_start..end));
        }
        if line.starts_with('@') {
            if decorated_from.is_none() {
                decorated_from = Some(start);
            }
        } else if let Some(kind) = header_kind(line) {
            let block_start = decorated_from.take().unwrap_or(start);
            open = Some((kind, block_start, start + line.len()));
        } else {
            decorated_from = None;
        }
    }

    if let Some((kind, block_start, end)) = open {
        spans.push((kind, block_start..end));
    }
    spans
}

/// Extract every top-level function and container unit as verbatim text
pub fn extract_units(source: &str) -> ExtractedUnits {
    let mut units = ExtractedUnits::default();
    for (kind, span) in block_spans(source) {
        let text = source[span].to_string();
        match kind {
            UnitKind::Function => units.functions.push(text),
            UnitKind::Container => units.containers.push(text),
        }
    }
    units
}

/// Delete the first verbatim occurrence of `unit`; unchanged if absent
pub fn remove_unit(source: &str, unit: &str) -> String {
    if unit.is_empty() {
        return source.to_string();
    }
    match source.find(unit) {
        Some(pos) => {
            let mut out = String::with_capacity(source.len() - unit.len());
            out.push_str(&source[..pos]);
            out.push_str(&source[pos + unit.len()..]);
            out
        }
        None => source.to_string(),
    }
}

/// Append `unit` as a new top-level block separated by a blank line
pub fn append_unit(source: &str, unit: &str) -> String {
    let mut out = String::with_capacity(source.len() + unit.len() + 2);
    out.push_str(source);
    if !out.is_empty() {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
    out.push_str(unit.trim_end_matches('\n'));
    out.push('\n');
    out
}

/// Substitute the first verbatim occurrence of `old` with `new`
pub fn replace_unit(source: &str, old: &str, new: &str) -> String {
    if old.is_empty() {
        return source.to_string();
    }
    source.replacen(old, new.trim_end_matches('\n'), 1)
}

/// Limits applied when recombining two parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecombineLimits {
    /// Maximum function units in the child
    pub max_functions: usize,
    /// Maximum container units in the child
    pub max_containers: usize,
    /// Children whose trimmed text is shorter than this are replaced by a
    /// freshly synthesized program
    pub min_length: usize,
}

impl Default for RecombineLimits {
    fn default() -> Self {
        Self {
            max_functions: 3,
            max_containers: 2,
            min_length: 50,
        }
    }
}

/// Build a child from the units of two parents.
///
/// Samples without replacement up to `max_functions` function units and
/// `max_containers` container units from the pooled parents. A child that
/// comes out too short is replaced by a fresh program; if the generator
/// fails the short child is returned as is.
pub fn recombine(
    units_a: &ExtractedUnits,
    units_b: &ExtractedUnits,
    limits: RecombineLimits,
    rng: &mut dyn RngCore,
    generator: &dyn ProgramGenerator,
) -> String {
    let mut child = String::from(CROSSOVER_HEADER);

    for kind in [UnitKind::Function, UnitKind::Container] {
        let pool: Vec<&String> = units_a
            .of_kind(kind)
            .iter()
            .chain(units_b.of_kind(kind))
            .collect();
        let cap = match kind {
            UnitKind::Function => limits.max_functions,
            UnitKind::Container => limits.max_containers,
        };
        for unit in pool.choose_multiple(&mut *rng, cap.min(pool.len())) {
            child.push_str(unit);
            child.push_str("\n\n");
        }
    }

    if child.trim().len() < limits.min_length {
        match generator.program(rng) {
            Ok(fresh) => return fresh,
            Err(e) => {
                tracing::warn!("Crossover fallback synthesis failed: {}", e);
            }
        }
    }
    child
}

/// Swap one infix arithmetic operator for a different one.
///
/// Picks uniformly among the operators present (as ` op `), then replaces
/// that operator's first occurrence. Unchanged when none is present.
pub fn replace_random_operator(source: &str, rng: &mut dyn RngCore) -> String {
    let present: Vec<&str> = ARITHMETIC_OPERATORS
        .iter()
        .copied()
        .filter(|op| source.contains(&format!(" {} ", op)))
        .collect();

    let Some(&target) = present.choose(&mut *rng) else {
        return source.to_string();
    };

    let alternatives: Vec<&str> = ARITHMETIC_OPERATORS
        .iter()
        .copied()
        .filter(|op| *op != target)
        .collect();
    let replacement = alternatives[rng.gen_range(0..alternatives.len())];

    source.replacen(
        &format!(" {} ", target),
        &format!(" {} ", replacement),
        1,
    )
}
