//! Conservation check for equation-like structures.
//!
//! A side is a list of `(molecule, coefficient)` terms. Its total for a category
//! is `Σ coefficient × unit_counts[category]`. Two sides balance when their
//! totals agree for every category that appears on either side, an absent
//! category counting as zero. Nothing here assumes a number of terms or
//! categories.

use std::collections::{BTreeMap, BTreeSet};

use lab_core::entities::{EquationSide, Molecule, Term};
use serde::Serialize;

use crate::error::EngineError;

/// Per-category weighted totals of one side.
pub type SideTotals = BTreeMap<String, u64>;

/// A category whose totals differ between the two sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Imbalance {
    pub category: String,
    pub reactant_total: u64,
    pub product_total: u64,
}

/// Weighted totals of `side`.
///
/// # Errors
///
/// Returns `InvalidCoefficient` for a coefficient `<= 0` and `CountOverflow`
/// if a total does not fit in a `u64`.
pub fn side_totals(side: &[Term]) -> Result<SideTotals, EngineError> {
    let mut totals = SideTotals::new();
    for term in side {
        let coefficient = u64::try_from(term.coefficient)
            .ok()
            .filter(|c| *c > 0)
            .ok_or_else(|| EngineError::InvalidCoefficient {
                entity: term.molecule.display_id.clone(),
                coefficient: term.coefficient,
            })?;
        for (category, count) in &term.molecule.unit_counts {
            let overflow = || EngineError::CountOverflow {
                category: category.clone(),
            };
            let weighted = coefficient
                .checked_mul(u64::from(*count))
                .ok_or_else(overflow)?;
            let total = totals.entry(category.clone()).or_insert(0);
            *total = total.checked_add(weighted).ok_or_else(overflow)?;
        }
    }
    Ok(totals)
}

/// Every category whose totals differ, in category order.
///
/// # Errors
///
/// Same as [`side_totals`], for either side.
pub fn imbalances(reactants: &[Term], products: &[Term]) -> Result<Vec<Imbalance>, EngineError> {
    let left = side_totals(reactants)?;
    let right = side_totals(products)?;
    let categories: BTreeSet<&String> = left.keys().chain(right.keys()).collect();

    Ok(categories
        .into_iter()
        .filter_map(|category| {
            let reactant_total = left.get(category).copied().unwrap_or(0);
            let product_total = right.get(category).copied().unwrap_or(0);
            (reactant_total != product_total).then(|| Imbalance {
                category: category.clone(),
                reactant_total,
                product_total,
            })
        })
        .collect())
}

/// Whether the two sides conserve every category.
///
/// # Errors
///
/// Same as [`side_totals`], for either side.
pub fn is_balanced(reactants: &[Term], products: &[Term]) -> Result<bool, EngineError> {
    Ok(imbalances(reactants, products)?.is_empty())
}

/// Coefficients found by [`solve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub reactants: EquationSide,
    pub products: EquationSide,
}

/// Find positive coefficients, each at most `max_coefficient`, that balance
/// the given molecules.
///
/// Candidates are tried by ascending coefficient sum, then lexicographically,
/// so the first hit is the smallest assignment. Returns `None` when either side
/// is empty or nothing within the bound balances.
#[must_use]
pub fn solve(reactants: &[Molecule], products: &[Molecule], max_coefficient: u32) -> Option<Solution> {
    if reactants.is_empty() || products.is_empty() || max_coefficient == 0 {
        return None;
    }

    let categories: BTreeSet<&String> = reactants
        .iter()
        .chain(products)
        .flat_map(|m| m.unit_counts.keys())
        .collect();
    // Signed count matrix: one row per molecule, reactants positive.
    let rows: Vec<Vec<i128>> = reactants
        .iter()
        .map(|m| (m, 1_i128))
        .chain(products.iter().map(|m| (m, -1_i128)))
        .map(|(molecule, sign)| {
            categories
                .iter()
                .map(|c| sign * i128::from(molecule.unit_counts.get(*c).copied().unwrap_or(0)))
                .collect()
        })
        .collect();

    let parts = rows.len();
    let max = u64::from(max_coefficient);
    let mut coefficients = Vec::with_capacity(parts);
    let parts_u64 = parts as u64;
    for sum in parts_u64..=parts_u64 * max {
        if search(&rows, sum, max, &mut coefficients) {
            let (left, right) = coefficients.split_at(reactants.len());
            return Some(Solution {
                reactants: to_side(reactants, left),
                products: to_side(products, right),
            });
        }
    }
    None
}

fn search(rows: &[Vec<i128>], remaining: u64, max: u64, prefix: &mut Vec<u64>) -> bool {
    let left = (rows.len() - prefix.len()) as u64;
    if left == 0 {
        return remaining == 0 && balances(rows, prefix);
    }
    let rest = left - 1;
    let lo = remaining.saturating_sub(rest * max).max(1);
    let hi = remaining.saturating_sub(rest).min(max);
    for value in lo..=hi {
        prefix.push(value);
        if search(rows, remaining - value, max, prefix) {
            return true;
        }
        prefix.pop();
    }
    false
}

fn balances(rows: &[Vec<i128>], coefficients: &[u64]) -> bool {
    let width = rows.first().map_or(0, Vec::len);
    (0..width).all(|col| {
        rows.iter()
            .zip(coefficients)
            .map(|(row, c)| row[col] * i128::from(*c))
            .sum::<i128>()
            == 0
    })
}

fn to_side(molecules: &[Molecule], coefficients: &[u64]) -> EquationSide {
    molecules
        .iter()
        .zip(coefficients)
        .map(|(m, c)| Term::new(m.clone(), i64::try_from(*c).unwrap_or(i64::MAX)))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn h2() -> Molecule {
        Molecule::new("H2", [("H", 2)])
    }
    fn o2() -> Molecule {
        Molecule::new("O2", [("O", 2)])
    }
    fn h2o() -> Molecule {
        Molecule::new("H2O", [("H", 2), ("O", 1)])
    }

    #[test]
    fn water_synthesis_balances_with_2_1_2() {
        let reactants = vec![Term::new(h2(), 2), Term::new(o2(), 1)];
        let products = vec![Term::new(h2o(), 2)];
        assert!(is_balanced(&reactants, &products).unwrap());
    }

    #[test]
    fn water_synthesis_with_unit_coefficients_is_unbalanced() {
        let reactants = vec![Term::new(h2(), 1), Term::new(o2(), 1)];
        let products = vec![Term::new(h2o(), 1)];
        assert!(!is_balanced(&reactants, &products).unwrap());
        assert_eq!(
            imbalances(&reactants, &products).unwrap(),
            vec![Imbalance {
                category: "O".into(),
                reactant_total: 2,
                product_total: 1,
            }]
        );
    }

    #[test]
    fn category_on_one_side_only_counts_as_zero() {
        let reactants = vec![Term::new(Molecule::new("NaCl", [("Na", 1), ("Cl", 1)]), 1)];
        let products = vec![Term::new(Molecule::new("Na", [("Na", 1)]), 1)];
        let gaps = imbalances(&reactants, &products).unwrap();
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].category, "Cl");
        assert_eq!(gaps[0].product_total, 0);
    }

    #[test]
    fn non_positive_coefficients_are_rejected() {
        for coefficient in [0, -2] {
            let err = side_totals(&[Term::new(h2(), coefficient)]).unwrap_err();
            assert!(matches!(
                err,
                EngineError::InvalidCoefficient { entity, coefficient: c }
                    if entity == "H2" && c == coefficient
            ));
        }
        // Product side is validated too.
        assert!(is_balanced(&[Term::new(h2(), 1)], &[Term::new(h2(), 0)]).is_err());
    }

    #[test]
    fn overflowing_totals_are_reported() {
        let big = Molecule::new("X", [("X", u32::MAX)]);
        let err = side_totals(&[Term::new(big, i64::MAX)]).unwrap_err();
        assert!(matches!(err, EngineError::CountOverflow { category } if category == "X"));
    }

    #[test]
    fn empty_sides_balance() {
        assert!(is_balanced(&[], &[]).unwrap());
    }

    #[test]
    fn solve_finds_smallest_water_coefficients() {
        let solution = solve(&[h2(), o2()], &[h2o()], 10).unwrap();
        let coefficients: Vec<i64> = solution
            .reactants
            .iter()
            .chain(&solution.products)
            .map(|t| t.coefficient)
            .collect();
        assert_eq!(coefficients, vec![2, 1, 2]);
        assert!(is_balanced(&solution.reactants, &solution.products).unwrap());
    }

    #[test]
    fn solve_propane_combustion() {
        let c3h8 = Molecule::new("C3H8", [("C", 3), ("H", 8)]);
        let co2 = Molecule::new("CO2", [("C", 1), ("O", 2)]);
        let solution = solve(&[c3h8, o2()], &[co2, h2o()], 10).unwrap();
        let coefficients: Vec<i64> = solution
            .reactants
            .iter()
            .chain(&solution.products)
            .map(|t| t.coefficient)
            .collect();
        assert_eq!(coefficients, vec![1, 5, 3, 4]);
    }

    #[test]
    fn solve_gives_up_outside_the_bound() {
        assert!(solve(&[h2(), o2()], &[h2o()], 1).is_none());
        assert!(solve(&[h2()], &[o2()], 10).is_none());
        assert!(solve(&[], &[h2o()], 10).is_none());
    }
}
