//! Exact symbolic squaring of a residual
//!
//! For every pair of terms `(m1, c1)`, `(m2, c2)` of the input the product
//! monomial is `m1 ∪ m2` (x² = x), with coefficient `c1²` on the diagonal and
//! `2·c1·c2` off it. The pass is O(n²) in the number of terms.

use std::collections::BTreeMap;

use crate::model::{BinaryPolynomial, Monomial, QuadraticModel};

use super::errors::CompileResult;

/// `residual²` as a binary polynomial of degree up to 4.
///
/// Fails with a domain error for non-binary or non-finite input. Every
/// variable of the residual is present in the result, with a zero linear
/// coefficient if no product touches it.
pub fn square(residual: &QuadraticModel) -> CompileResult<BinaryPolynomial> {
    residual.ensure_binary()?;
    residual.ensure_finite()?;

    let terms: Vec<(Monomial, f64)> = residual
        .to_polynomial()
        .into_terms()
        .into_iter()
        .filter(|(_, c)| *c != 0.0)
        .collect();

    let mut squared: BTreeMap<Monomial, f64> = BTreeMap::new();
    for v in residual.variables() {
        squared.insert(Monomial::single(v.clone()), 0.0);
    }

    for (i, (m1, c1)) in terms.iter().enumerate() {
        *squared.entry(m1.clone()).or_insert(0.0) += c1 * c1;
        for (m2, c2) in &terms[i + 1..] {
            *squared.entry(m1.union(m2)).or_insert(0.0) += 2.0 * c1 * c2;
        }
    }

    Ok(BinaryPolynomial::from_terms(residual.vartype(), squared))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Assignment, VarKey, Vartype};

    fn x(i: usize) -> VarKey {
        VarKey::select(i, 0)
    }

    #[test]
    fn test_square_of_single_term() {
        let mut r = QuadraticModel::binary();
        r.add_linear(x(0), -3.0);
        let sq = square(&r).unwrap();
        assert_eq!(sq.len(), 1);
        assert_eq!(sq.get(&Monomial::single(x(0))), Some(9.0));
    }

    #[test]
    fn test_constant_cross_terms() {
        // (x - 1)² = x - 2x + 1 = 1 - x
        let mut r = QuadraticModel::binary();
        r.add_linear(x(0), 1.0);
        r.set_offset(-1.0);
        let sq = square(&r).unwrap();
        assert_eq!(sq.get(&Monomial::single(x(0))), Some(-1.0));
        assert_eq!(sq.offset(), 1.0);
    }

    #[test]
    fn test_quadratic_residual_gives_quartic() {
        let mut r = QuadraticModel::binary();
        r.add_quadratic(x(0), x(1), 1.0);
        r.add_quadratic(x(2), x(3), 1.0);
        let sq = square(&r).unwrap();
        assert_eq!(sq.degree(), 4);
        assert_eq!(
            sq.get(&Monomial::from_vars([x(0), x(1), x(2), x(3)])),
            Some(2.0)
        );
    }

    #[test]
    fn test_square_matches_pointwise_square() {
        let mut r = QuadraticModel::binary();
        r.add_linear(x(0), 2.0);
        r.add_linear(x(1), -5.0);
        r.add_quadratic(x(0), x(2), 3.0);
        r.set_offset(4.0);
        let sq = square(&r).unwrap();

        for bits in 0u8..8 {
            let mut a = Assignment::new();
            for i in 0..3 {
                a.insert(x(i), ((bits >> i) & 1) as i8);
            }
            let e = r.energy(&a);
            assert_eq!(sq.energy(&a), e * e, "assignment {:03b}", bits);
        }
    }

    #[test]
    fn test_zero_coefficient_variable_kept() {
        let mut r = QuadraticModel::binary();
        r.add_variable(x(7));
        r.add_linear(x(0), 1.0);
        let sq = square(&r).unwrap();
        assert!(sq.variables().contains(&x(7)));
    }

    #[test]
    fn test_spin_input_rejected() {
        let mut r = QuadraticModel::new(Vartype::Spin);
        r.add_linear(x(0), 1.0);
        assert_eq!(square(&r).unwrap_err().code(), "QUBO_DOMAIN_ERROR");
    }
}
