//! `labrun balance`: check an equation as written, or search for coefficients.

use lab_core::entities::{Molecule, Term};
use lab_engine::conservation::{self, Imbalance};
use lab_engine::formula::parse_equation;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::BalanceArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct CheckReport {
    equation: String,
    balanced: bool,
    imbalances: Vec<Imbalance>,
}

#[derive(Debug, Serialize)]
struct SolveReport {
    equation: String,
    reactant_coefficients: Vec<i64>,
    product_coefficients: Vec<i64>,
}

/// Handle `labrun balance`. Needs no store.
pub fn handle(args: &BalanceArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.solve {
        output(&solve(&args.equation, args.max)?, flags.format)
    } else {
        output(&check(&args.equation)?, flags.format)
    }
}

fn check(equation: &str) -> anyhow::Result<CheckReport> {
    let (reactants, products) = parse_equation(equation)?;
    let imbalances = conservation::imbalances(&reactants, &products)?;
    Ok(CheckReport {
        equation: render(&reactants, &products),
        balanced: imbalances.is_empty(),
        imbalances,
    })
}

fn solve(equation: &str, max: u32) -> anyhow::Result<SolveReport> {
    let (reactants, products) = parse_equation(equation)?;
    let molecules = |side: &[Term]| -> Vec<Molecule> {
        side.iter().map(|term| term.molecule.clone()).collect()
    };

    let solution = conservation::solve(&molecules(&reactants), &molecules(&products), max)
        .ok_or_else(|| anyhow::anyhow!("no balancing coefficients up to {max} for '{equation}'"))?;

    let coefficients =
        |side: &[Term]| -> Vec<i64> { side.iter().map(|term| term.coefficient).collect() };
    Ok(SolveReport {
        equation: render(&solution.reactants, &solution.products),
        reactant_coefficients: coefficients(&solution.reactants),
        product_coefficients: coefficients(&solution.products),
    })
}

fn render(reactants: &[Term], products: &[Term]) -> String {
    format!("{} -> {}", render_side(reactants), render_side(products))
}

fn render_side(side: &[Term]) -> String {
    side.iter()
        .map(|term| {
            if term.coefficient == 1 {
                term.molecule.display_id.clone()
            } else {
                format!("{}{}", term.coefficient, term.molecule.display_id)
            }
        })
        .collect::<Vec<_>>()
        .join(" + ")
}
