use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A weighted entity with per-category unit counts, e.g. `H2O` = `{H: 2, O: 1}`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Molecule {
    pub display_id: String,
    pub unit_counts: BTreeMap<String, u32>,
}

impl Molecule {
    /// Build a molecule from `(category, count)` pairs. Repeated categories add up.
    #[must_use]
    pub fn new<'a>(
        display_id: impl Into<String>,
        counts: impl IntoIterator<Item = (&'a str, u32)>,
    ) -> Self {
        let mut unit_counts = BTreeMap::new();
        for (category, count) in counts {
            *unit_counts.entry(category.to_string()).or_insert(0) += count;
        }
        Self {
            display_id: display_id.into(),
            unit_counts,
        }
    }
}

/// A molecule paired with its user-entered coefficient.
///
/// The coefficient is signed so that malformed input (zero, negative) reaches
/// the validator and is rejected there instead of being lost in parsing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Term {
    pub molecule: Molecule,
    pub coefficient: i64,
}

impl Term {
    #[must_use]
    pub const fn new(molecule: Molecule, coefficient: i64) -> Self {
        Self {
            molecule,
            coefficient,
        }
    }
}

/// One side of an equation: an ordered sequence of terms.
pub type EquationSide = Vec<Term>;
