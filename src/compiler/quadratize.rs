//! Quadratization of higher-order binary polynomials
//!
//! [`Quadratizer`] is the narrow seam any polynomial-to-QUBO reduction plugs
//! into. [`SubstitutionQuadratizer`] implements reduction by substitution: the
//! pair of variables `(u, v)` shared by the most terms of degree > 2 is
//! replaced by an auxiliary `p = u·v`, enforced with
//!
//! `strength · (u·v - 2·u·p - 2·v·p + 3·p)`
//!
//! which is 0 when `p = u·v` and at least `strength` otherwise. Only terms of
//! degree > 2 are rewritten; an existing `u·v` term keeps its own variables.
//! Repeats until every term has degree ≤ 2. Ties between pairs go to the
//! smallest pair in key order, so the reduction is deterministic.
//!
//! The strength actually applied is the configured one raised to
//! `1 + Σ|c|` over the input terms of degree > 2. Those are the only terms an
//! auxiliary can reach, so a wrong auxiliary always costs more than it can
//! gain, and the minimum over auxiliaries equals the input at every
//! assignment of the original variables.

use std::collections::BTreeMap;

use crate::model::{BinaryPolynomial, Monomial, QuadraticModel, VarKey};

use super::errors::{CompileError, CompileResult};

/// Reduces a binary polynomial to an equivalent quadratic model
pub trait Quadratizer {
    fn quadratize(&self, poly: &BinaryPolynomial) -> CompileResult<QuadraticModel>;
}

/// Reduction by pairwise substitution; `strength` is a floor on the
/// enforcement penalty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubstitutionQuadratizer {
    strength: f64,
}

impl SubstitutionQuadratizer {
    pub fn new(strength: f64) -> CompileResult<Self> {
        if !strength.is_finite() || strength <= 0.0 {
            return Err(CompileError::configuration(format!(
                "quadratization strength must be a positive finite number, got {}",
                strength
            )));
        }
        Ok(Self { strength })
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Enforcement penalty used for `poly`
    pub fn effective_strength(&self, poly: &BinaryPolynomial) -> f64 {
        let reach: f64 = poly
            .iter()
            .filter(|(m, _)| m.degree() > 2)
            .map(|(_, c)| c.abs())
            .sum();
        self.strength.max(1.0 + reach)
    }
}

impl Quadratizer for SubstitutionQuadratizer {
    fn quadratize(&self, poly: &BinaryPolynomial) -> CompileResult<QuadraticModel> {
        if poly.vartype() != crate::model::Vartype::Binary {
            return Err(CompileError::Domain(format!(
                "substitution requires a BINARY polynomial, found {}",
                poly.vartype()
            )));
        }
        poly.ensure_finite()?;

        let strength = self.effective_strength(poly);
        let mut terms: BTreeMap<Monomial, f64> = poly.clone().into_terms();
        let mut model = QuadraticModel::binary();

        while let Some((u, v)) = most_common_pair(&terms) {
            let p = VarKey::product(u.clone(), v.clone());

            let mut reduced = BTreeMap::new();
            for (monomial, c) in terms {
                let monomial = if monomial.degree() > 2 {
                    monomial.substitute(&u, &v, &p)
                } else {
                    monomial
                };
                *reduced.entry(monomial).or_insert(0.0) += c;
            }
            terms = reduced;

            model.add_quadratic(u.clone(), v.clone(), strength);
            model.add_quadratic(p.clone(), u, -2.0 * strength);
            model.add_quadratic(p.clone(), v, -2.0 * strength);
            model.add_linear(p, 3.0 * strength);
        }

        let rest = QuadraticModel::try_from_polynomial(&BinaryPolynomial::from_terms(
            poly.vartype(),
            terms,
        ))?;
        model.add_model(&rest)?;

        for v in poly.variables() {
            model.add_variable(v);
        }
        Ok(model)
    }
}

/// Pair shared by the most terms of degree > 2
fn most_common_pair(terms: &BTreeMap<Monomial, f64>) -> Option<(VarKey, VarKey)> {
    let mut counts: BTreeMap<(&VarKey, &VarKey), usize> = BTreeMap::new();
    for monomial in terms.keys().filter(|m| m.degree() > 2) {
        let vars: Vec<&VarKey> = monomial.iter().collect();
        for (i, u) in vars.iter().enumerate() {
            for v in &vars[i + 1..] {
                *counts.entry((*u, *v)).or_insert(0) += 1;
            }
        }
    }

    let mut best: Option<((&VarKey, &VarKey), usize)> = None;
    for (pair, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((pair, count));
        }
    }
    best.map(|((u, v), _)| (u.clone(), v.clone()))
}
