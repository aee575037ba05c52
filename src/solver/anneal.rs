//! Simulated annealing
//!
//! Metropolis single-flip sweeps under a geometric inverse-temperature
//! schedule. Each read starts from a uniformly random state. Without an
//! explicit range, β runs from `ln 2 / max_flip` (a worst-case flip is still
//! accepted half the time) to `ln 100 / min_bias` (the smallest bias is
//! rejected 99 times in 100).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::QuadraticModel;

use super::errors::{SolverError, SolverResult};
use super::indexed::IndexedModel;
use super::sample::{Sample, SampleSet};
use super::Sampler;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedAnnealingSampler {
    num_sweeps: usize,
    beta_range: Option<(f64, f64)>,
    seed: Option<u64>,
}

impl SimulatedAnnealingSampler {
    pub fn new(num_sweeps: usize) -> Self {
        Self {
            num_sweeps,
            beta_range: None,
            seed: None,
        }
    }

    /// Fixed `(hot, cold)` inverse temperatures
    pub fn with_beta_range(mut self, hot: f64, cold: f64) -> Self {
        self.beta_range = Some((hot, cold));
        self
    }

    /// Reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn schedule(&self, model: &IndexedModel) -> SolverResult<Vec<f64>> {
        if self.num_sweeps == 0 {
            return Err(SolverError::unavailable("annealing needs at least one sweep"));
        }
        let (hot, cold) = match self.beta_range {
            Some(range) => range,
            None => default_beta_range(model),
        };
        if !(hot.is_finite() && cold.is_finite()) || hot <= 0.0 || cold < hot {
            return Err(SolverError::unavailable(format!(
                "invalid beta range ({}, {})",
                hot, cold
            )));
        }

        if self.num_sweeps == 1 {
            return Ok(vec![cold]);
        }
        let ratio = (cold / hot).powf(1.0 / (self.num_sweeps - 1) as f64);
        Ok((0..self.num_sweeps)
            .map(|k| hot * ratio.powi(k as i32))
            .collect())
    }
}

impl Default for SimulatedAnnealingSampler {
    fn default() -> Self {
        Self::new(1000)
    }
}

fn default_beta_range(model: &IndexedModel) -> (f64, f64) {
    let max_field = model.max_field();
    match model.min_bias() {
        Some(min_bias) if max_field > 0.0 => {
            let hot = std::f64::consts::LN_2 / max_field;
            let cold = 100f64.ln() / min_bias;
            (hot, cold.max(hot))
        }
        _ => (0.1, 1.0),
    }
}

impl Sampler for SimulatedAnnealingSampler {
    fn name(&self) -> &'static str {
        "anneal"
    }

    fn sample(&self, model: &QuadraticModel, num_reads: usize) -> SolverResult<SampleSet> {
        if num_reads == 0 {
            return Err(SolverError::unavailable("at least one read is required"));
        }
        let indexed = IndexedModel::from_model(model)?;
        let schedule = self.schedule(&indexed)?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let n = indexed.len();
        let mut samples = Vec::with_capacity(num_reads);
        for _ in 0..num_reads {
            let mut state: Vec<u8> = (0..n).map(|_| rng.gen_range(0..=1)).collect();
            for beta in &schedule {
                for k in 0..n {
                    let field = indexed.local_field(&state, k);
                    let delta = if state[k] == 0 { field } else { -field };
                    if delta <= 0.0 || rng.gen::<f64>() < (-beta * delta).exp() {
                        state[k] ^= 1;
                    }
                }
            }
            samples.push(Sample::new(indexed.assignment(&state), indexed.energy(&state)));
        }
        Ok(SampleSet::aggregate(samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VarKey;
    use crate::solver::ExactSolver;

    fn x(i: usize) -> VarKey {
        VarKey::select(i, 0)
    }

    fn frustrated() -> QuadraticModel {
        let mut m = QuadraticModel::binary();
        for i in 0..6 {
            m.add_linear(x(i), -1.0);
        }
        for i in 0..5 {
            m.add_quadratic(x(i), x(i + 1), 2.0);
        }
        m
    }

    #[test]
    fn test_reaches_exact_ground_energy() {
        let m = frustrated();
        let exact = ExactSolver::new().sample(&m, 1).unwrap();
        let annealed = SimulatedAnnealingSampler::new(200)
            .with_seed(7)
            .sample(&m, 20)
            .unwrap();
        assert_eq!(
            annealed.first().unwrap().energy,
            exact.first().unwrap().energy
        );
        assert_eq!(annealed.total_reads(), 20);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let m = frustrated();
        let sampler = SimulatedAnnealingSampler::new(50).with_seed(42);
        assert_eq!(sampler.sample(&m, 5).unwrap(), sampler.sample(&m, 5).unwrap());
    }

    #[test]
    fn test_schedule_is_geometric() {
        let indexed = IndexedModel::from_model(&frustrated()).unwrap();
        let schedule = SimulatedAnnealingSampler::new(3)
            .with_beta_range(1.0, 4.0)
            .schedule(&indexed)
            .unwrap();
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0], 1.0);
        assert!((schedule[1] - 2.0).abs() < 1e-12);
        assert!((schedule[2] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_beta_range_rejected() {
        let m = frustrated();
        let err = SimulatedAnnealingSampler::new(10)
            .with_beta_range(2.0, 1.0)
            .sample(&m, 1)
            .unwrap_err();
        assert_eq!(err.code(), "QUBO_SOLVER_UNAVAILABLE");
    }

    #[test]
    fn test_zero_sweeps_rejected() {
        assert!(SimulatedAnnealingSampler::new(0)
            .sample(&frustrated(), 1)
            .is_err());
    }
}
