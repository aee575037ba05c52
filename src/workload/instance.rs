//! Problem instances and input normalization
//!
//! Estimator output is measured in planner cost units (benefits, baseline) and
//! bytes (index sizes, budget). Normalization floor-divides both by a
//! configurable factor so that every coefficient entering the QUBO is a small
//! integer.

use serde::{Deserialize, Serialize};

use crate::compiler::{CompileError, CompileResult};

use super::candidate::Candidate;

/// Estimator output before normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInstance {
    pub candidates: Vec<Candidate>,
    pub n_templates: usize,
    pub n_replicas: usize,
    /// `benefits[candidate][template]`: cost reduction in planner units
    pub benefits: Vec<Vec<f64>>,
    /// `costs[candidate]`: index size in bytes
    pub costs: Vec<f64>,
    /// `baseline[template]`: unindexed cost in planner units
    pub baseline: Vec<f64>,
    /// Storage budget per replica in bytes
    pub storage_budget: f64,
    /// `frequencies[template]`, all 1 when absent
    #[serde(default)]
    pub frequencies: Option<Vec<i64>>,
}

/// Divisors applied during normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationConfig {
    #[serde(default = "default_cost_factor")]
    pub cost_factor: f64,
    #[serde(default = "default_benefit_factor")]
    pub benefit_factor: f64,
}

fn default_cost_factor() -> f64 {
    80_000_000.0
}
fn default_benefit_factor() -> f64 {
    100_000.0
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            cost_factor: default_cost_factor(),
            benefit_factor: default_benefit_factor(),
        }
    }
}

impl NormalizationConfig {
    pub fn validate(&self) -> CompileResult<()> {
        for (name, factor) in [
            ("cost_factor", self.cost_factor),
            ("benefit_factor", self.benefit_factor),
        ] {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(CompileError::configuration(format!(
                    "{} must be a positive finite number, got {}",
                    name, factor
                )));
            }
        }
        Ok(())
    }
}

/// Result of [`normalize`]
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub instance: ProblemInstance,
    /// `(candidate, template)` pairs whose negative benefit was clamped to 0
    pub clamped: Vec<(usize, usize)>,
}

/// Floor-divide raw estimator output into an integral [`ProblemInstance`].
///
/// Negative benefits (an index that slows a template down) are clamped to 0
/// and reported in [`Normalized::clamped`].
pub fn normalize(raw: &RawInstance, config: &NormalizationConfig) -> CompileResult<Normalized> {
    config.validate()?;

    let scale = |value: f64, factor: f64, what: &str| -> CompileResult<i64> {
        if !value.is_finite() {
            return Err(CompileError::Domain(format!("non-finite {}: {}", what, value)));
        }
        Ok((value / factor).floor() as i64)
    };

    let mut clamped = Vec::new();
    let mut benefits = Vec::with_capacity(raw.benefits.len());
    for (i, row) in raw.benefits.iter().enumerate() {
        let mut normalized_row = Vec::with_capacity(row.len());
        for (q, value) in row.iter().enumerate() {
            let v = scale(*value, config.benefit_factor, "benefit")?;
            if v < 0 {
                clamped.push((i, q));
                normalized_row.push(0);
            } else {
                normalized_row.push(v);
            }
        }
        benefits.push(normalized_row);
    }

    let costs = raw
        .costs
        .iter()
        .map(|c| scale(*c, config.cost_factor, "cost"))
        .collect::<CompileResult<Vec<_>>>()?;
    let baseline = raw
        .baseline
        .iter()
        .map(|c| scale(*c, config.benefit_factor, "baseline"))
        .collect::<CompileResult<Vec<_>>>()?;
    let storage_budget = scale(raw.storage_budget, config.cost_factor, "storage budget")?;

    let mut instance = ProblemInstance::new(
        raw.candidates.clone(),
        raw.n_templates,
        raw.n_replicas,
        benefits,
        costs,
        baseline,
        storage_budget,
    )?;
    if let Some(frequencies) = &raw.frequencies {
        instance = instance.with_frequencies(frequencies.clone())?;
    }

    Ok(Normalized { instance, clamped })
}

/// Immutable, validated input of one optimization run
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemInstance {
    candidates: Vec<Candidate>,
    n_templates: usize,
    n_replicas: usize,
    benefits: Vec<Vec<i64>>,
    costs: Vec<i64>,
    baseline: Vec<i64>,
    frequencies: Vec<i64>,
    storage_budget: i64,
}

impl ProblemInstance {
    /// Create an instance with unit template frequencies.
    ///
    /// Fails with `InvalidInstance` when dimensions disagree or a benefit or
    /// cost is negative.
    pub fn new(
        candidates: Vec<Candidate>,
        n_templates: usize,
        n_replicas: usize,
        benefits: Vec<Vec<i64>>,
        costs: Vec<i64>,
        baseline: Vec<i64>,
        storage_budget: i64,
    ) -> CompileResult<Self> {
        let instance = Self {
            frequencies: vec![1; n_templates],
            candidates,
            n_templates,
            n_replicas,
            benefits,
            costs,
            baseline,
            storage_budget,
        };
        instance.validate()?;
        Ok(instance)
    }

    /// Replace the per-template frequencies
    pub fn with_frequencies(mut self, frequencies: Vec<i64>) -> CompileResult<Self> {
        self.frequencies = frequencies;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> CompileResult<()> {
        let n = self.candidates.len();
        if self.n_replicas == 0 {
            return Err(CompileError::invalid_instance("at least one replica is required"));
        }
        if self.benefits.len() != n {
            return Err(CompileError::invalid_instance(format!(
                "benefit matrix has {} rows for {} candidates",
                self.benefits.len(),
                n
            )));
        }
        if let Some((i, row)) = self
            .benefits
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.n_templates)
        {
            return Err(CompileError::invalid_instance(format!(
                "benefit row {} has {} columns for {} templates",
                i,
                row.len(),
                self.n_templates
            )));
        }
        if self.costs.len() != n {
            return Err(CompileError::invalid_instance(format!(
                "cost vector has {} entries for {} candidates",
                self.costs.len(),
                n
            )));
        }
        if self.baseline.len() != self.n_templates {
            return Err(CompileError::invalid_instance(format!(
                "baseline has {} entries for {} templates",
                self.baseline.len(),
                self.n_templates
            )));
        }
        if self.frequencies.len() != self.n_templates {
            return Err(CompileError::invalid_instance(format!(
                "frequencies have {} entries for {} templates",
                self.frequencies.len(),
                self.n_templates
            )));
        }
        if self.benefits.iter().flatten().any(|v| *v < 0) {
            return Err(CompileError::invalid_instance("benefits must be non-negative"));
        }
        if self.costs.iter().any(|c| *c < 0) {
            return Err(CompileError::invalid_instance("storage costs must be non-negative"));
        }
        if self.frequencies.iter().any(|f| *f < 0) {
            return Err(CompileError::invalid_instance("frequencies must be non-negative"));
        }
        Ok(())
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn n_candidates(&self) -> usize {
        self.candidates.len()
    }

    pub fn n_templates(&self) -> usize {
        self.n_templates
    }

    pub fn n_replicas(&self) -> usize {
        self.n_replicas
    }

    pub fn benefit(&self, candidate: usize, template: usize) -> i64 {
        self.benefits[candidate][template]
    }

    pub fn cost(&self, candidate: usize) -> i64 {
        self.costs[candidate]
    }

    pub fn costs(&self) -> &[i64] {
        &self.costs
    }

    pub fn baseline(&self, template: usize) -> i64 {
        self.baseline[template]
    }

    pub fn frequency(&self, template: usize) -> i64 {
        self.frequencies[template]
    }

    /// Normalized storage budget per replica
    pub fn storage_budget(&self) -> i64 {
        self.storage_budget
    }
}
