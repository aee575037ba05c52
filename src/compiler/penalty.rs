//! Penalty calibration
//!
//! A constraint's quadratic form is scaled in place by λ:
//!
//! - Heuristic: λ = 10 × max |bias| over the model's own linear and quadratic
//!   biases. Violations are strongly discouraged but may still trade off
//!   against the objective.
//! - Constant: λ supplied by the caller. The exactly-one-route constraint uses
//!   a hard constant far above every other term so that no low-energy sample
//!   violates it.

use crate::model::QuadraticModel;

use super::errors::{CompileError, CompileResult};

/// Multiplier of the heuristic penalty
pub const HEURISTIC_MULTIPLIER: f64 = 10.0;

/// How λ is chosen for one constraint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Penalty {
    /// λ derived from the model's largest coefficient
    Heuristic,
    /// Caller-supplied λ
    Constant(f64),
}

impl Penalty {
    /// `None` selects the heuristic
    pub fn from_option(lambda: Option<f64>) -> Self {
        lambda.map_or(Penalty::Heuristic, Penalty::Constant)
    }

    pub fn is_heuristic(&self) -> bool {
        matches!(self, Penalty::Heuristic)
    }

    /// Scale `model` and return the λ that was applied
    pub fn apply(&self, model: &mut QuadraticModel) -> CompileResult<f64> {
        let lambda = match self {
            Penalty::Heuristic => heuristic_lambda(model)?,
            Penalty::Constant(lambda) => {
                if !lambda.is_finite() || *lambda <= 0.0 {
                    return Err(CompileError::configuration(format!(
                        "penalty weight must be a positive finite number, got {}",
                        lambda
                    )));
                }
                *lambda
            }
        };
        model.scale(lambda);
        Ok(lambda)
    }
}

/// `10 × max |bias|`; fails when the model has no non-zero bias
pub fn heuristic_lambda(model: &QuadraticModel) -> CompileResult<f64> {
    match model.max_abs_bias() {
        None => Err(CompileError::DegenerateModel(
            "cannot derive a penalty from a model without coefficients".into(),
        )),
        Some(max) if max == 0.0 => Err(CompileError::DegenerateModel(
            "cannot derive a penalty from a model whose coefficients are all zero".into(),
        )),
        Some(max) if !max.is_finite() => Err(CompileError::Domain(
            "non-finite coefficient in penalty calibration".into(),
        )),
        Some(max) => Ok(HEURISTIC_MULTIPLIER * max),
    }
}

/// λ for a hard constraint whose squared residual is at least 1 when violated.
///
/// Exceeds the combined span of `soft`, so breaking the hard constraint never
/// pays for itself; `floor` is the smallest value returned.
pub fn dominating_lambda<'a>(
    soft: impl IntoIterator<Item = &'a QuadraticModel>,
    floor: f64,
) -> CompileResult<f64> {
    let span: f64 = soft.into_iter().map(QuadraticModel::bias_span).sum();
    if !span.is_finite() {
        return Err(CompileError::Domain(
            "non-finite coefficient in hard penalty calibration".into(),
        ));
    }
    Ok(floor.max(1.0 + span))
}

/// Scale `model` by `lambda`, or by the heuristic weight when `None`
pub fn calibrate(model: &mut QuadraticModel, lambda: Option<f64>) -> CompileResult<f64> {
    Penalty::from_option(lambda).apply(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VarKey;

    fn x(i: usize) -> VarKey {
        VarKey::select(i, 0)
    }

    #[test]
    fn test_heuristic_uses_max_abs_bias() {
        let mut model = QuadraticModel::binary();
        model.add_linear(x(0), -4.0);
        model.add_quadratic(x(0), x(1), 3.0);
        model.set_offset(100.0);

        let lambda = calibrate(&mut model, None).unwrap();
        assert_eq!(lambda, 40.0);
        assert_eq!(model.get_linear(&x(0)), Some(-160.0));
        assert_eq!(model.offset(), 4000.0);
    }

    #[test]
    fn test_constant_penalty() {
        let mut model = QuadraticModel::binary();
        model.add_linear(x(0), 2.0);
        assert_eq!(calibrate(&mut model, Some(1e6)).unwrap(), 1e6);
        assert_eq!(model.get_linear(&x(0)), Some(2e6));
    }

    #[test]
    fn test_empty_model_is_degenerate() {
        let mut model = QuadraticModel::binary();
        model.set_offset(3.0);
        let err = calibrate(&mut model, None).unwrap_err();
        assert_eq!(err.code(), "QUBO_DEGENERATE_MODEL");
    }

    #[test]
    fn test_all_zero_model_is_degenerate() {
        let mut model = QuadraticModel::binary();
        model.add_variable(x(0));
        assert_eq!(
            calibrate(&mut model, None).unwrap_err().code(),
            "QUBO_DEGENERATE_MODEL"
        );
    }

    #[test]
    fn test_constant_penalty_on_empty_model_is_allowed() {
        let mut model = QuadraticModel::binary();
        assert!(calibrate(&mut model, Some(5.0)).is_ok());
    }

    #[test]
    fn test_dominating_lambda_exceeds_soft_span() {
        let mut a = QuadraticModel::binary();
        a.add_linear(x(0), -3e12);
        let mut b = QuadraticModel::binary();
        b.add_quadratic(x(0), x(1), 2e12);
        assert_eq!(dominating_lambda([&a, &b], 1e12).unwrap(), 1.0 + 5e12);
    }

    #[test]
    fn test_dominating_lambda_keeps_floor() {
        let mut a = QuadraticModel::binary();
        a.add_linear(x(0), 7.0);
        assert_eq!(dominating_lambda([&a], 1e12).unwrap(), 1e12);
        assert_eq!(dominating_lambda(std::iter::empty(), 5.0).unwrap(), 5.0);
    }

    #[test]
    fn test_invalid_constant_rejected() {
        let mut model = QuadraticModel::binary();
        model.add_linear(x(0), 1.0);
        assert!(calibrate(&mut model, Some(-1.0)).is_err());
        assert!(calibrate(&mut model, Some(f64::NAN)).is_err());
    }
}
