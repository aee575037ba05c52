//! Quadratic models (degree ≤ 2)
//!
//! A `QuadraticModel` represents
//! `offset + Σ linear_i x_i + Σ quadratic_{i,j} x_i x_j`.
//!
//! Every variable touched by `add_linear`, `add_quadratic` or `add_variable`
//! is registered in the linear map, with a zero bias if it has none. The
//! registered set is the model's bit layout, and summing models never drops a
//! variable even when its biases cancel.

use std::collections::{BTreeMap, BTreeSet};

use super::errors::{ModelError, ModelResult};
use super::polynomial::{BinaryPolynomial, Monomial};
use super::variable::VarKey;
use super::{Assignment, Vartype};

#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticModel {
    vartype: Vartype,
    linear: BTreeMap<VarKey, f64>,
    quadratic: BTreeMap<(VarKey, VarKey), f64>,
    offset: f64,
}

impl QuadraticModel {
    pub fn new(vartype: Vartype) -> Self {
        Self {
            vartype,
            linear: BTreeMap::new(),
            quadratic: BTreeMap::new(),
            offset: 0.0,
        }
    }

    /// Empty binary model
    pub fn binary() -> Self {
        Self::new(Vartype::Binary)
    }

    pub fn vartype(&self) -> Vartype {
        self.vartype
    }

    /// Registers `v` with a zero bias if it is not present yet
    pub fn add_variable(&mut self, v: VarKey) {
        self.linear.entry(v).or_insert(0.0);
    }

    pub fn add_linear(&mut self, v: VarKey, bias: f64) {
        *self.linear.entry(v).or_insert(0.0) += bias;
    }

    /// Adds `bias · u · v`.
    ///
    /// A self-interaction folds into the linear term for binary variables
    /// (x² = x) and into the offset for spins (s² = 1).
    pub fn add_quadratic(&mut self, u: VarKey, v: VarKey, bias: f64) {
        if u == v {
            match self.vartype {
                Vartype::Binary => self.add_linear(u, bias),
                Vartype::Spin => {
                    self.add_variable(u);
                    self.offset += bias;
                }
            }
            return;
        }
        self.add_variable(u.clone());
        self.add_variable(v.clone());
        let key = if u < v { (u, v) } else { (v, u) };
        *self.quadratic.entry(key).or_insert(0.0) += bias;
    }

    pub fn add_offset(&mut self, value: f64) {
        self.offset += value;
    }

    pub fn set_offset(&mut self, value: f64) {
        self.offset = value;
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn get_linear(&self, v: &VarKey) -> Option<f64> {
        self.linear.get(v).copied()
    }

    pub fn get_quadratic(&self, u: &VarKey, v: &VarKey) -> Option<f64> {
        let key = if u < v {
            (u.clone(), v.clone())
        } else {
            (v.clone(), u.clone())
        };
        self.quadratic.get(&key).copied()
    }

    pub fn linear(&self) -> impl Iterator<Item = (&VarKey, f64)> {
        self.linear.iter().map(|(v, b)| (v, *b))
    }

    pub fn quadratic(&self) -> impl Iterator<Item = (&VarKey, &VarKey, f64)> {
        self.quadratic.iter().map(|((u, v), b)| (u, v, *b))
    }

    pub fn variables(&self) -> impl Iterator<Item = &VarKey> {
        self.linear.keys()
    }

    pub fn contains(&self, v: &VarKey) -> bool {
        self.linear.contains_key(v)
    }

    pub fn num_variables(&self) -> usize {
        self.linear.len()
    }

    pub fn num_interactions(&self) -> usize {
        self.quadratic.len()
    }

    /// True when the model has no variables
    pub fn is_empty(&self) -> bool {
        self.linear.is_empty() && self.quadratic.is_empty()
    }

    /// Multiplies every bias and the offset by `factor`
    pub fn scale(&mut self, factor: f64) {
        self.offset *= factor;
        for bias in self.linear.values_mut() {
            *bias *= factor;
        }
        for bias in self.quadratic.values_mut() {
            *bias *= factor;
        }
    }

    /// Largest absolute linear or quadratic bias; the offset is not a coefficient
    pub fn max_abs_bias(&self) -> Option<f64> {
        self.linear
            .values()
            .chain(self.quadratic.values())
            .map(|b| b.abs())
            .fold(None, |acc, b| Some(acc.map_or(b, |m: f64| m.max(b))))
    }

    /// `Σ |bias|`: an upper bound on max energy - min energy
    pub fn bias_span(&self) -> f64 {
        self.linear
            .values()
            .chain(self.quadratic.values())
            .map(|b| b.abs())
            .sum()
    }

    pub fn energy(&self, assignment: &Assignment) -> f64 {
        let value = |v: &VarKey| f64::from(assignment.get(v).copied().unwrap_or(0));
        let mut energy = self.offset;
        for (v, bias) in &self.linear {
            energy += bias * value(v);
        }
        for ((u, v), bias) in &self.quadratic {
            energy += bias * value(u) * value(v);
        }
        energy
    }

    /// Adds every term of `other` into `self`, keyed by variable identity
    pub fn add_model(&mut self, other: &QuadraticModel) -> ModelResult<()> {
        self.check_vartype(other)?;
        self.offset += other.offset;
        for (v, bias) in &other.linear {
            self.add_linear(v.clone(), *bias);
        }
        for ((u, v), bias) in &other.quadratic {
            *self.quadratic.entry((u.clone(), v.clone())).or_insert(0.0) += bias;
        }
        Ok(())
    }

    /// Subtracts every term of `other` from `self`
    pub fn sub_model(&mut self, other: &QuadraticModel) -> ModelResult<()> {
        let mut negated = other.clone();
        negated.scale(-1.0);
        self.add_model(&negated)
    }

    pub fn to_polynomial(&self) -> BinaryPolynomial {
        let mut terms = BTreeMap::new();
        if self.offset != 0.0 {
            terms.insert(Monomial::constant(), self.offset);
        }
        for (v, bias) in &self.linear {
            terms.insert(Monomial::single(v.clone()), *bias);
        }
        for ((u, v), bias) in &self.quadratic {
            terms.insert(Monomial::pair(u.clone(), v.clone()), *bias);
        }
        BinaryPolynomial::from_terms(self.vartype, terms)
    }

    /// Builds a model from a polynomial of degree ≤ 2
    pub fn try_from_polynomial(poly: &BinaryPolynomial) -> ModelResult<Self> {
        let mut model = QuadraticModel::new(poly.vartype());
        for (monomial, coefficient) in poly.iter() {
            let vars: Vec<&VarKey> = monomial.iter().collect();
            match vars.as_slice() {
                [] => model.add_offset(*coefficient),
                [v] => model.add_linear((*v).clone(), *coefficient),
                [u, v] => model.add_quadratic((*u).clone(), (*v).clone(), *coefficient),
                _ => {
                    return Err(ModelError::DegreeTooHigh {
                        term: monomial.to_string(),
                        degree: monomial.degree(),
                    })
                }
            }
        }
        Ok(model)
    }

    /// Fails unless the model is binary
    pub fn ensure_binary(&self) -> ModelResult<()> {
        match self.vartype {
            Vartype::Binary => Ok(()),
            other => Err(ModelError::NotBinary(other)),
        }
    }

    /// Fails on NaN or infinite biases
    pub fn ensure_finite(&self) -> ModelResult<()> {
        if !self.offset.is_finite() {
            return Err(ModelError::NonFinite("offset".into()));
        }
        if let Some((v, _)) = self.linear.iter().find(|(_, b)| !b.is_finite()) {
            return Err(ModelError::NonFinite(v.to_string()));
        }
        if let Some(((u, v), _)) = self.quadratic.iter().find(|(_, b)| !b.is_finite()) {
            return Err(ModelError::NonFinite(format!("{}*{}", u, v)));
        }
        Ok(())
    }

    /// Owned copy of the registered variables
    pub fn variable_set(&self) -> BTreeSet<VarKey> {
        self.linear.keys().cloned().collect()
    }

    fn check_vartype(&self, other: &QuadraticModel) -> ModelResult<()> {
        if self.vartype != other.vartype {
            return Err(ModelError::VartypeMismatch {
                left: self.vartype,
                right: other.vartype,
            });
        }
        Ok(())
    }
}

impl Default for QuadraticModel {
    fn default() -> Self {
        Self::binary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x(i: usize) -> VarKey {
        VarKey::select(i, 0)
    }

    #[test]
    fn test_bias_span_ignores_offset() {
        let mut model = QuadraticModel::binary();
        model.add_linear(VarKey::select(0, 0), -4.0);
        model.add_quadratic(VarKey::select(0, 0), VarKey::route(0, 0), 3.0);
        model.set_offset(100.0);
        assert_eq!(model.bias_span(), 7.0);
    }

    #[test]
    fn test_quadratic_registers_endpoints() {
        let mut model = QuadraticModel::binary();
        model.add_quadratic(x(0), x(1), 3.0);
        assert_eq!(model.num_variables(), 2);
        assert_eq!(model.get_linear(&x(0)), Some(0.0));
        assert_eq!(model.get_quadratic(&x(1), &x(0)), Some(3.0));
    }

    #[test]
    fn test_binary_self_interaction_is_linear() {
        let mut model = QuadraticModel::binary();
        model.add_quadratic(x(0), x(0), 2.0);
        assert_eq!(model.num_interactions(), 0);
        assert_eq!(model.get_linear(&x(0)), Some(2.0));
    }

    #[test]
    fn test_scale_includes_offset() {
        let mut model = QuadraticModel::binary();
        model.add_linear(x(0), -1.0);
        model.add_quadratic(x(0), x(1), 2.0);
        model.set_offset(1.0);
        model.scale(10.0);
        assert_eq!(model.offset(), 10.0);
        assert_eq!(model.get_linear(&x(0)), Some(-10.0));
        assert_eq!(model.get_quadratic(&x(0), &x(1)), Some(20.0));
    }

    #[test]
    fn test_max_abs_bias_ignores_offset() {
        let mut model = QuadraticModel::binary();
        model.set_offset(1000.0);
        assert_eq!(model.max_abs_bias(), None);
        model.add_linear(x(0), -7.0);
        model.add_quadratic(x(0), x(1), 3.0);
        assert_eq!(model.max_abs_bias(), Some(7.0));
    }

    #[test]
    fn test_add_model_keeps_cancelled_variables() {
        let mut a = QuadraticModel::binary();
        a.add_linear(x(0), 2.0);
        let mut b = QuadraticModel::binary();
        b.add_linear(x(0), -2.0);
        a.add_model(&b).unwrap();
        assert!(a.contains(&x(0)));
        assert_eq!(a.get_linear(&x(0)), Some(0.0));
    }

    #[test]
    fn test_add_model_rejects_mixed_vartypes() {
        let mut a = QuadraticModel::binary();
        let b = QuadraticModel::new(Vartype::Spin);
        assert!(matches!(
            a.add_model(&b),
            Err(ModelError::VartypeMismatch { .. })
        ));
    }

    #[test]
    fn test_polynomial_round_trip_preserves_energy() {
        let mut model = QuadraticModel::binary();
        model.add_linear(x(0), 1.5);
        model.add_quadratic(x(0), x(1), -4.0);
        model.set_offset(2.0);

        let back = QuadraticModel::try_from_polynomial(&model.to_polynomial()).unwrap();
        let mut a = Assignment::new();
        a.insert(x(0), 1);
        a.insert(x(1), 1);
        assert_eq!(back.energy(&a), model.energy(&a));
        assert_eq!(model.energy(&a), -0.5);
    }

    #[test]
    fn test_cubic_polynomial_rejected() {
        let mut poly = BinaryPolynomial::binary();
        poly.add_term(Monomial::from_vars([x(0), x(1), x(2)]), 1.0);
        assert!(matches!(
            QuadraticModel::try_from_polynomial(&poly),
            Err(ModelError::DegreeTooHigh { degree: 3, .. })
        ));
    }
}
