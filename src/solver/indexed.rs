//! Dense index-based view of a quadratic model used by the samplers

use crate::model::{Assignment, QuadraticModel, VarKey};

use super::errors::SolverResult;

/// Variables numbered in key order, biases in flat vectors
#[derive(Debug, Clone)]
pub(crate) struct IndexedModel {
    variables: Vec<VarKey>,
    linear: Vec<f64>,
    neighbors: Vec<Vec<(usize, f64)>>,
    offset: f64,
}

impl IndexedModel {
    pub(crate) fn from_model(model: &QuadraticModel) -> SolverResult<Self> {
        model.ensure_binary()?;
        model.ensure_finite()?;

        let variables: Vec<VarKey> = model.variables().cloned().collect();
        let index = |v: &VarKey| variables.binary_search(v).ok();

        let mut linear = vec![0.0; variables.len()];
        for (v, bias) in model.linear() {
            if let Some(k) = index(v) {
                linear[k] += bias;
            }
        }

        let mut neighbors = vec![Vec::new(); variables.len()];
        for (u, v, bias) in model.quadratic() {
            if let (Some(a), Some(b)) = (index(u), index(v)) {
                neighbors[a].push((b, bias));
                neighbors[b].push((a, bias));
            }
        }

        Ok(Self {
            variables,
            linear,
            neighbors,
            offset: model.offset(),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.variables.len()
    }

    pub(crate) fn offset(&self) -> f64 {
        self.offset
    }

    /// Energy change per unit increase of bit `k` given the rest of `state`
    pub(crate) fn local_field(&self, state: &[u8], k: usize) -> f64 {
        self.linear[k]
            + self.neighbors[k]
                .iter()
                .filter(|(j, _)| state[*j] == 1)
                .map(|(_, bias)| bias)
                .sum::<f64>()
    }

    pub(crate) fn energy(&self, state: &[u8]) -> f64 {
        let mut energy = self.offset;
        for k in 0..self.len() {
            if state[k] == 0 {
                continue;
            }
            energy += self.linear[k];
            for (j, bias) in &self.neighbors[k] {
                // each interaction is stored twice; count it from its lower end
                if *j > k && state[*j] == 1 {
                    energy += bias;
                }
            }
        }
        energy
    }

    /// Largest possible energy change of a single flip
    pub(crate) fn max_field(&self) -> f64 {
        (0..self.len())
            .map(|k| {
                self.linear[k].abs() + self.neighbors[k].iter().map(|(_, b)| b.abs()).sum::<f64>()
            })
            .fold(0.0, f64::max)
    }

    /// Smallest non-zero absolute bias
    pub(crate) fn min_bias(&self) -> Option<f64> {
        self.linear
            .iter()
            .chain(self.neighbors.iter().flatten().map(|(_, b)| b))
            .map(|b| b.abs())
            .filter(|b| *b > 0.0)
            .min_by(f64::total_cmp)
    }

    pub(crate) fn assignment(&self, state: &[u8]) -> Assignment {
        self.variables
            .iter()
            .zip(state)
            .map(|(v, bit)| (v.clone(), *bit as i8))
            .collect()
    }
}
