//! Binary optimization model types
//!
//! Everything the compiler produces or consumes is expressed with the types in
//! this module:
//!
//! - [`VarKey`]: structured identity of one binary decision variable
//! - [`Monomial`]: duplicate-free product of variables (empty = constant)
//! - [`BinaryPolynomial`]: monomial -> coefficient, any degree
//! - [`QuadraticModel`]: degree ≤ 2 polynomial split into offset, linear and
//!   quadratic biases
//!
//! # Invariants
//!
//! - Monomials are normalized sets, so `x·y` and `y·x` are the same key and
//!   `x·x` collapses to `x`.
//! - Quadratic keys are stored with the smaller variable first.
//! - Iteration order is `BTreeMap` order, so every derived artifact is
//!   deterministic for identical inputs.

mod errors;
mod polynomial;
mod quadratic;
mod variable;

pub use errors::{ModelError, ModelResult};
pub use polynomial::{BinaryPolynomial, Monomial};
pub use quadratic::QuadraticModel;
pub use variable::{SlackSpace, VarKey};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Value assigned to every variable of a model.
///
/// Binary models use `0`/`1`, spin models `-1`/`+1`.
pub type Assignment = BTreeMap<VarKey, i8>;

/// Variable domain of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Vartype {
    /// {0, 1}; satisfies x² = x
    Binary,
    /// {-1, +1}; satisfies s² = 1
    Spin,
}

impl Vartype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vartype::Binary => "BINARY",
            Vartype::Spin => "SPIN",
        }
    }

    /// Checks whether `value` belongs to this domain
    pub fn admits(&self, value: i8) -> bool {
        match self {
            Vartype::Binary => value == 0 || value == 1,
            Vartype::Spin => value == -1 || value == 1,
        }
    }
}

impl fmt::Display for Vartype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vartype_domain() {
        assert!(Vartype::Binary.admits(0));
        assert!(Vartype::Binary.admits(1));
        assert!(!Vartype::Binary.admits(-1));
        assert!(Vartype::Spin.admits(-1));
        assert!(!Vartype::Spin.admits(0));
    }

    #[test]
    fn test_vartype_serde_name() {
        let json = serde_json::to_string(&Vartype::Binary).unwrap();
        assert_eq!(json, "\"BINARY\"");
    }
}
