//! Chemical formula and equation parsing.
//!
//! Formulas are element symbols (`Na`, `O`) with optional counts, grouped with
//! `()` or `[]` and a group multiplier: `Ca(OH)2`, `K4[Fe(CN)6]`. Equations are
//! `+`-separated terms with optional leading coefficients on each side of
//! `->`, `→` or `=`.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;

use lab_core::entities::{EquationSide, Molecule, Term};

use crate::error::EngineError;

const ARROWS: [&str; 3] = ["->", "→", "="];

/// Parse a single formula such as `"Ca(OH)2"`.
///
/// # Errors
///
/// Returns `EngineError::Formula` for malformed input and `CountOverflow` if a
/// multiplied count exceeds `u32`.
pub fn parse_molecule(formula: &str) -> Result<Molecule, EngineError> {
    let formula = formula.trim();
    if formula.is_empty() {
        return Err(EngineError::Formula("empty formula".into()));
    }

    let mut chars = formula.chars().peekable();
    let counts = parse_group(&mut chars, None)?;
    if counts.is_empty() {
        return Err(EngineError::Formula(format!("no elements in '{formula}'")));
    }
    Ok(Molecule {
        display_id: formula.to_string(),
        unit_counts: counts,
    })
}

/// Parse `"2H2 + O2 -> 2H2O"` into reactant and product sides.
///
/// Coefficients default to 1. A zero coefficient is kept so the validator can
/// reject it.
///
/// # Errors
///
/// Returns `EngineError::Formula` when the arrow is missing or repeated, a term
/// is empty, or a formula is malformed.
pub fn parse_equation(equation: &str) -> Result<(EquationSide, EquationSide), EngineError> {
    let (left, right) = ARROWS
        .iter()
        .find_map(|arrow| equation.split_once(arrow))
        .ok_or_else(|| EngineError::Formula(format!("no arrow in '{equation}'")))?;
    if ARROWS.iter().any(|arrow| right.contains(arrow)) {
        return Err(EngineError::Formula(format!("more than one arrow in '{equation}'")));
    }
    Ok((parse_side(left)?, parse_side(right)?))
}

fn parse_side(side: &str) -> Result<EquationSide, EngineError> {
    side.split('+').map(parse_term).collect()
}

fn parse_term(term: &str) -> Result<Term, EngineError> {
    let term = term.trim();
    let digits = term.chars().take_while(char::is_ascii_digit).count();
    let (coefficient, formula) = term.split_at(digits);
    let coefficient = if coefficient.is_empty() {
        1
    } else {
        coefficient
            .parse::<i64>()
            .map_err(|e| EngineError::Formula(format!("bad coefficient in '{term}': {e}")))?
    };
    if formula.trim().is_empty() {
        return Err(EngineError::Formula(format!("missing formula in term '{term}'")));
    }
    Ok(Term::new(parse_molecule(formula)?, coefficient))
}

/// Parse until end of input or the matching `close` bracket.
fn parse_group(
    chars: &mut Peekable<Chars<'_>>,
    close: Option<char>,
) -> Result<BTreeMap<String, u32>, EngineError> {
    let mut counts = BTreeMap::new();
    while let Some(&c) = chars.peek() {
        match c {
            'A'..='Z' => {
                chars.next();
                let mut symbol = c.to_string();
                while let Some(&lower) = chars.peek().filter(|l| l.is_ascii_lowercase()) {
                    symbol.push(lower);
                    chars.next();
                }
                let count = parse_count(chars)?.unwrap_or(1);
                add(&mut counts, symbol, count)?;
            }
            '(' | '[' => {
                chars.next();
                let inner = parse_group(chars, Some(if c == '(' { ')' } else { ']' }))?;
                let multiplier = parse_count(chars)?.unwrap_or(1);
                for (symbol, count) in inner {
                    let scaled = count
                        .checked_mul(multiplier)
                        .ok_or_else(|| EngineError::CountOverflow {
                            category: symbol.clone(),
                        })?;
                    add(&mut counts, symbol, scaled)?;
                }
            }
            ')' | ']' => {
                chars.next();
                return if close == Some(c) {
                    Ok(counts)
                } else {
                    Err(EngineError::Formula(format!("unexpected '{c}'")))
                };
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            other => return Err(EngineError::Formula(format!("unexpected '{other}'"))),
        }
    }
    match close {
        Some(expected) => Err(EngineError::Formula(format!("missing '{expected}'"))),
        None => Ok(counts),
    }
}

fn parse_count(chars: &mut Peekable<Chars<'_>>) -> Result<Option<u32>, EngineError> {
    let mut digits = String::new();
    while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
        digits.push(d);
        chars.next();
    }
    if digits.is_empty() {
        return Ok(None);
    }
    let count: u32 = digits
        .parse()
        .map_err(|e| EngineError::Formula(format!("bad count '{digits}': {e}")))?;
    if count == 0 {
        return Err(EngineError::Formula("zero count".into()));
    }
    Ok(Some(count))
}

fn add(counts: &mut BTreeMap<String, u32>, symbol: String, count: u32) -> Result<(), EngineError> {
    let entry = counts.entry(symbol.clone()).or_insert(0);
    *entry = entry
        .checked_add(count)
        .ok_or(EngineError::CountOverflow { category: symbol })?;
    Ok(())
}
