//! Solver configuration
//!
//! Loaded from the `solver` section of the CLI config file.

use serde::{Deserialize, Serialize};

use super::anneal::SimulatedAnnealingSampler;
use super::errors::{SolverError, SolverResult};
use super::exact::{ExactSolver, DEFAULT_MAX_EXACT_VARIABLES};
use super::Sampler;

/// Backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverMode {
    /// Exhaustive enumeration (small models only)
    Exact,
    /// Simulated annealing
    Anneal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_mode")]
    pub mode: SolverMode,

    #[serde(default = "default_num_reads")]
    pub num_reads: usize,

    /// Sweeps per annealing read
    #[serde(default = "default_num_sweeps")]
    pub num_sweeps: usize,

    /// `[hot, cold]` inverse temperatures; derived from the model when absent
    #[serde(default)]
    pub beta_range: Option<[f64; 2]>,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_max_exact_variables")]
    pub max_exact_variables: usize,
}

fn default_mode() -> SolverMode {
    SolverMode::Anneal
}
fn default_num_reads() -> usize {
    100
}
fn default_num_sweeps() -> usize {
    1000
}
fn default_max_exact_variables() -> usize {
    DEFAULT_MAX_EXACT_VARIABLES
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            num_reads: default_num_reads(),
            num_sweeps: default_num_sweeps(),
            beta_range: None,
            seed: None,
            max_exact_variables: default_max_exact_variables(),
        }
    }
}

impl SolverConfig {
    pub fn exact() -> Self {
        Self {
            mode: SolverMode::Exact,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SolverResult<()> {
        if self.num_reads == 0 {
            return Err(SolverError::unavailable("num_reads must be at least 1"));
        }
        if self.mode == SolverMode::Anneal && self.num_sweeps == 0 {
            return Err(SolverError::unavailable("num_sweeps must be at least 1"));
        }
        if let Some([hot, cold]) = self.beta_range {
            if !(hot.is_finite() && cold.is_finite()) || hot <= 0.0 || cold < hot {
                return Err(SolverError::unavailable(format!(
                    "beta_range must satisfy 0 < hot <= cold, got [{}, {}]",
                    hot, cold
                )));
            }
        }
        Ok(())
    }

    /// Validated sampler for the configured backend
    pub fn build(&self) -> SolverResult<Box<dyn Sampler>> {
        self.validate()?;
        let sampler: Box<dyn Sampler> = match self.mode {
            SolverMode::Exact => Box::new(ExactSolver::with_max_variables(self.max_exact_variables)),
            SolverMode::Anneal => {
                let mut sampler = SimulatedAnnealingSampler::new(self.num_sweeps);
                if let Some([hot, cold]) = self.beta_range {
                    sampler = sampler.with_beta_range(hot, cold);
                }
                if let Some(seed) = self.seed {
                    sampler = sampler.with_seed(seed);
                }
                Box::new(sampler)
            }
        };
        Ok(sampler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config: SolverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn test_mode_parsing() {
        let config: SolverConfig =
            serde_json::from_str(r#"{"mode": "exact", "num_reads": 5}"#).unwrap();
        assert_eq!(config.mode, SolverMode::Exact);
        assert_eq!(config.build().unwrap().name(), "exact");
    }

    #[test]
    fn test_zero_reads_rejected() {
        let config = SolverConfig {
            num_reads: 0,
            ..SolverConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().code(), "QUBO_SOLVER_UNAVAILABLE");
    }

    #[test]
    fn test_inverted_beta_range_rejected() {
        let config = SolverConfig {
            beta_range: Some([5.0, 1.0]),
            ..SolverConfig::default()
        };
        assert!(config.build().is_err());
    }
}
