//! Exhaustive enumeration
//!
//! Walks all 2^n assignments in Gray-code order, so consecutive states differ
//! in one bit and each energy is an O(degree) update of the previous one. The
//! `num_reads` lowest states are kept in a bounded max-heap and their energies
//! recomputed from scratch before they are returned.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::model::QuadraticModel;

use super::errors::{SolverError, SolverResult};
use super::indexed::IndexedModel;
use super::sample::{Sample, SampleSet};
use super::Sampler;

/// Default ceiling on the number of variables enumerated
pub const DEFAULT_MAX_EXACT_VARIABLES: usize = 24;

/// Ground-truth sampler for small models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactSolver {
    max_variables: usize,
}

impl ExactSolver {
    pub fn new() -> Self {
        Self {
            max_variables: DEFAULT_MAX_EXACT_VARIABLES,
        }
    }

    pub fn with_max_variables(max_variables: usize) -> Self {
        Self { max_variables }
    }

    pub fn max_variables(&self) -> usize {
        self.max_variables
    }
}

impl Default for ExactSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Heap entry; greater means worse
#[derive(Debug, Clone, Copy)]
struct Ranked {
    energy: f64,
    state: u64,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.energy
            .total_cmp(&other.energy)
            .then(self.state.cmp(&other.state))
    }
}

impl Sampler for ExactSolver {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn sample(&self, model: &QuadraticModel, num_reads: usize) -> SolverResult<SampleSet> {
        if num_reads == 0 {
            return Err(SolverError::unavailable("at least one read is required"));
        }
        let indexed = IndexedModel::from_model(model)?;
        let n = indexed.len();
        if n > self.max_variables || n >= u64::BITS as usize {
            return Err(SolverError::unavailable(format!(
                "exact enumeration over {} variables exceeds the limit of {}",
                n, self.max_variables
            )));
        }

        let total: u64 = 1 << n;
        let keep = (num_reads as u64).min(total) as usize;

        let mut heap: BinaryHeap<Ranked> = BinaryHeap::with_capacity(keep + 1);
        let mut bits = vec![0u8; n];
        let mut code: u64 = 0;
        let mut energy = indexed.offset();

        for i in 0..total {
            if i > 0 {
                let k = i.trailing_zeros() as usize;
                let field = indexed.local_field(&bits, k);
                if bits[k] == 0 {
                    energy += field;
                    bits[k] = 1;
                } else {
                    energy -= field;
                    bits[k] = 0;
                }
                code ^= 1 << k;
            }

            let entry = Ranked {
                energy,
                state: code,
            };
            if heap.len() < keep {
                heap.push(entry);
            } else if heap.peek().is_some_and(|worst| entry < *worst) {
                heap.pop();
                heap.push(entry);
            }
        }

        let samples = heap
            .into_iter()
            .map(|ranked| {
                let state: Vec<u8> = (0..n).map(|k| ((ranked.state >> k) & 1) as u8).collect();
                Sample::new(indexed.assignment(&state), indexed.energy(&state))
            })
            .collect();
        Ok(SampleSet::from_samples(samples))
    }
}
