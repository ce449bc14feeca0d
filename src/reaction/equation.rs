//! Chemical equation parsing.
//!
//! Accepts the human-readable strings the client sends, e.g. `"2A = B"`,
//! `"A + B -> C + D"`, `"B ⇌ 2A"`. Terms are separated by `+`, each with an
//! optional integer stoichiometric coefficient prefix; the two sides are
//! separated by `=`, `->`, `→` or `⇌`.

use crate::config::ConfigError;

/// One side entry of a parsed equation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationTerm {
    pub coefficient: u32,
    pub symbol: String,
}

/// A parsed reaction equation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    pub reactants: Vec<EquationTerm>,
    pub products: Vec<EquationTerm>,
}

// Checked longest-first so "->" is not misread as a malformed "="
const SEPARATORS: [&str; 4] = ["⇌", "->", "→", "="];

impl Equation {
    /// Parses an equation string into reactant and product terms.
    pub fn parse(equation: &str) -> Result<Self, ConfigError> {
        let malformed = || ConfigError::MalformedEquation(equation.to_string());

        let (lhs, rhs) = SEPARATORS
            .iter()
            .find_map(|sep| equation.split_once(sep))
            .ok_or_else(malformed)?;

        let reactants = parse_side(lhs, equation)?;
        let products = parse_side(rhs, equation)?;
        Ok(Equation {
            reactants,
            products,
        })
    }

    /// Expands stoichiometric coefficients into one entry per particle,
    /// e.g. `2A` becomes `["A", "A"]`.
    pub fn expanded_reactants(&self) -> Vec<&str> {
        expand(&self.reactants)
    }

    /// See [`Equation::expanded_reactants`].
    pub fn expanded_products(&self) -> Vec<&str> {
        expand(&self.products)
    }
}

fn expand(terms: &[EquationTerm]) -> Vec<&str> {
    terms
        .iter()
        .flat_map(|term| std::iter::repeat_n(term.symbol.as_str(), term.coefficient as usize))
        .collect()
}

fn parse_side(side: &str, equation: &str) -> Result<Vec<EquationTerm>, ConfigError> {
    let malformed = || ConfigError::MalformedEquation(equation.to_string());

    let mut terms = Vec::new();
    for raw in side.split('+') {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(malformed());
        }

        let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
        let symbol = raw[digits.len()..].trim();
        if symbol.is_empty() || !symbol.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(malformed());
        }
        let coefficient = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().map_err(|_| malformed())?
        };
        if coefficient == 0 {
            return Err(malformed());
        }

        terms.push(EquationTerm {
            coefficient,
            symbol: symbol.to_string(),
        });
    }
    Ok(terms)
}
