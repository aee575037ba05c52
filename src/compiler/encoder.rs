//! Binary integer encoder
//!
//! Represents a bounded non-negative integer as `Σ_j 2^j b_j` over
//! `k = floor(log2(bound))` bits. The representable range is `[0, 2^k - 1]`
//! and `2^k - 1 < bound` for every bound: the encoded value never reaches the
//! bound itself.
//!
//! A bound of 1 yields zero bits: the encoded integer is pinned at 0.
//! Bounds ≤ 0 are rejected.

use std::collections::BTreeMap;

use crate::model::{Assignment, QuadraticModel, SlackSpace, VarKey};

use super::errors::{CompileError, CompileResult};

/// Bits of one encoded integer, in ascending weight order
#[derive(Debug, Clone, PartialEq)]
pub struct SlackEncoding {
    space: SlackSpace,
    bound: i64,
    bits: Vec<(VarKey, f64)>,
}

/// Encode a bounded integer in `space`.
///
/// Variables are `VarKey::Slack { space, bit }`, so encodings of different
/// spaces never share a variable.
pub fn encode(space: SlackSpace, bound: i64) -> CompileResult<SlackEncoding> {
    if bound <= 0 {
        return Err(CompileError::configuration(format!(
            "cannot encode '{}' with non-positive bound {}",
            space, bound
        )));
    }

    let bits = (0..bit_count(bound))
        .map(|j| (VarKey::slack(space, j), (1u64 << j) as f64))
        .collect();

    Ok(SlackEncoding { space, bound, bits })
}

/// floor(log2(bound)) for bound ≥ 1
fn bit_count(bound: i64) -> u32 {
    u64::BITS - 1 - (bound as u64).leading_zeros()
}

impl SlackEncoding {
    pub fn space(&self) -> SlackSpace {
        self.space
    }

    /// The bound this encoding was requested for
    pub fn bound(&self) -> i64 {
        self.bound
    }

    pub fn bits(&self) -> &[(VarKey, f64)] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Largest representable value, `2^k - 1`
    pub fn max_value(&self) -> i64 {
        (1i64 << self.bits.len()) - 1
    }

    /// `{variable: weight}` view of the encoding
    pub fn weights(&self) -> BTreeMap<VarKey, f64> {
        self.bits.iter().cloned().collect()
    }

    /// Linear model `Σ_j 2^j b_j`
    pub fn to_model(&self) -> QuadraticModel {
        let mut model = QuadraticModel::binary();
        for (v, weight) in &self.bits {
            model.add_linear(v.clone(), *weight);
        }
        model
    }

    /// Integer value encoded by `assignment`
    pub fn value(&self, assignment: &Assignment) -> i64 {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, (v, _))| assignment.get(v).copied().unwrap_or(0) == 1)
            .map(|(j, _)| 1i64 << j)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_count_is_floor_log2() {
        assert_eq!(bit_count(1), 0);
        assert_eq!(bit_count(2), 1);
        assert_eq!(bit_count(3), 1);
        assert_eq!(bit_count(8), 3);
        assert_eq!(bit_count(500), 8);
    }

    #[test]
    fn test_bound_one_yields_no_bits() {
        let enc = encode(SlackSpace::Objective, 1).unwrap();
        assert!(enc.is_empty());
        assert_eq!(enc.max_value(), 0);
    }

    #[test]
    fn test_non_positive_bound_rejected() {
        for bound in [0, -5] {
            let err = encode(SlackSpace::Objective, bound).unwrap_err();
            assert_eq!(err.code(), "QUBO_CONFIGURATION_ERROR");
        }
    }

    #[test]
    fn test_value_decoding() {
        let enc = encode(SlackSpace::ReplicaCost { replica: 0 }, 16).unwrap();
        let mut a = Assignment::new();
        a.insert(enc.bits()[0].0.clone(), 1);
        a.insert(enc.bits()[2].0.clone(), 1);
        assert_eq!(enc.value(&a), 5);
    }

    #[test]
    fn test_names_derive_from_space() {
        let enc = encode(SlackSpace::StorageBudget { replica: 2 }, 4).unwrap();
        let names: Vec<String> = enc.bits().iter().map(|(v, _)| v.to_string()).collect();
        assert_eq!(names, vec!["s-wmax-r2-0", "s-wmax-r2-1"]);
    }
}
