//! Monomials and arbitrary-degree binary polynomials

use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::fmt;

use super::errors::{ModelError, ModelResult};
use super::variable::VarKey;
use super::{Assignment, Vartype};

/// Unordered, duplicate-free product of variables.
///
/// The empty monomial is the constant term.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(BTreeSet<VarKey>);

impl Monomial {
    /// The constant term
    pub fn constant() -> Self {
        Self(BTreeSet::new())
    }

    pub fn single(v: VarKey) -> Self {
        Self(BTreeSet::from([v]))
    }

    pub fn pair(u: VarKey, v: VarKey) -> Self {
        Self(BTreeSet::from([u, v]))
    }

    pub fn from_vars(vars: impl IntoIterator<Item = VarKey>) -> Self {
        Self(vars.into_iter().collect())
    }

    /// Product of two monomials under x² = x (set union)
    pub fn union(&self, other: &Monomial) -> Monomial {
        Monomial(self.0.union(&other.0).cloned().collect())
    }

    pub fn degree(&self) -> usize {
        self.0.len()
    }

    pub fn is_constant(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, v: &VarKey) -> bool {
        self.0.contains(v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VarKey> {
        self.0.iter()
    }

    /// Value of the product under `assignment`; unassigned variables read as 0
    pub fn evaluate(&self, assignment: &Assignment) -> f64 {
        self.0
            .iter()
            .map(|v| f64::from(assignment.get(v).copied().unwrap_or(0)))
            .product()
    }

    /// Replaces the pair `u`, `v` by `p` when both are present
    pub(crate) fn substitute(&self, u: &VarKey, v: &VarKey, p: &VarKey) -> Monomial {
        if !(self.0.contains(u) && self.0.contains(v)) {
            return self.clone();
        }
        let mut vars = self.0.clone();
        vars.remove(u);
        vars.remove(v);
        vars.insert(p.clone());
        Monomial(vars)
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "1");
        }
        let names: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", names.join("*"))
    }
}

/// Binary polynomial of any degree: monomial -> coefficient.
///
/// Zero coefficients are kept so that a variable mentioned by a term stays
/// visible to [`BinaryPolynomial::variables`].
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryPolynomial {
    vartype: Vartype,
    terms: BTreeMap<Monomial, f64>,
}

impl BinaryPolynomial {
    pub fn new(vartype: Vartype) -> Self {
        Self {
            vartype,
            terms: BTreeMap::new(),
        }
    }

    pub fn binary() -> Self {
        Self::new(Vartype::Binary)
    }

    pub fn vartype(&self) -> Vartype {
        self.vartype
    }

    /// Accumulates `coefficient` onto `monomial`
    pub fn add_term(&mut self, monomial: Monomial, coefficient: f64) {
        *self.terms.entry(monomial).or_insert(0.0) += coefficient;
    }

    pub fn get(&self, monomial: &Monomial) -> Option<f64> {
        self.terms.get(monomial).copied()
    }

    /// Coefficient of the constant term
    pub fn offset(&self) -> f64 {
        self.terms.get(&Monomial::constant()).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Monomial, f64> {
        self.terms.iter()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Highest monomial degree (0 for an empty polynomial)
    pub fn degree(&self) -> usize {
        self.terms.keys().map(Monomial::degree).max().unwrap_or(0)
    }

    pub fn variables(&self) -> BTreeSet<VarKey> {
        self.terms
            .keys()
            .flat_map(|m| m.iter().cloned())
            .collect()
    }

    pub fn energy(&self, assignment: &Assignment) -> f64 {
        self.terms
            .iter()
            .map(|(m, c)| c * m.evaluate(assignment))
            .sum()
    }

    /// Fails on NaN or infinite coefficients
    pub fn ensure_finite(&self) -> ModelResult<()> {
        match self.terms.iter().find(|(_, c)| !c.is_finite()) {
            Some((m, _)) => Err(ModelError::NonFinite(m.to_string())),
            None => Ok(()),
        }
    }

    pub(crate) fn into_terms(self) -> BTreeMap<Monomial, f64> {
        self.terms
    }

    pub(crate) fn from_terms(vartype: Vartype, terms: BTreeMap<Monomial, f64>) -> Self {
        Self { vartype, terms }
    }
}
