//! Conservation integration tests
//!
//! Parses equations the way a balancing exercise receives them and checks
//! them with the validator and solver.

use pretty_assertions::assert_eq;
use rstest::rstest;

use lab_core::entities::Term;
use lab_engine::conservation::{imbalances, is_balanced, solve};
use lab_engine::formula::{parse_equation, parse_molecule};

fn coefficients(side: &[Term]) -> Vec<i64> {
    side.iter().map(|t| t.coefficient).collect()
}

#[rstest]
#[case("2H2 + O2 -> 2H2O", true)]
#[case("H2 + O2 -> H2O", false)]
#[case("CH4 + 2O2 -> CO2 + 2H2O", true)]
#[case("2Al + 3Cl2 -> 2AlCl3", true)]
#[case("Ca(OH)2 + 2HCl -> CaCl2 + 2H2O", true)]
#[case("Ca(OH)2 + HCl -> CaCl2 + H2O", false)]
fn parsed_equations(#[case] equation: &str, #[case] balanced: bool) {
    let (reactants, products) = parse_equation(equation).unwrap();
    assert_eq!(is_balanced(&reactants, &products).unwrap(), balanced);
}

#[test]
fn imbalance_feedback_names_each_category() {
    let (reactants, products) = parse_equation("Ca(OH)2 + HCl -> CaCl2 + H2O").unwrap();
    let gaps = imbalances(&reactants, &products).unwrap();
    let categories: Vec<_> = gaps.iter().map(|g| g.category.as_str()).collect();
    assert_eq!(categories, vec!["Cl", "H", "O"]);
}

#[test]
fn solver_balances_parsed_molecules() {
    let reactants = vec![parse_molecule("Fe").unwrap(), parse_molecule("O2").unwrap()];
    let products = vec![parse_molecule("Fe2O3").unwrap()];

    let solution = solve(&reactants, &products, 8).unwrap();
    assert_eq!(coefficients(&solution.reactants), vec![4, 3]);
    assert_eq!(coefficients(&solution.products), vec![2]);
    assert!(is_balanced(&solution.reactants, &solution.products).unwrap());
}
