//! Compiler configuration
//!
//! Loaded from the `compiler` section of the CLI config file. Every field has a
//! default, so an empty object is a valid configuration.

use serde::{Deserialize, Serialize};

use super::errors::{CompileError, CompileResult};

/// Penalty weights and bounds used when assembling the QUBO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Bound of the shared objective encoding and of each replica cost slack
    #[serde(default = "default_objective_bound")]
    pub objective_bound: i64,

    /// Weight `C` on every pair of routing bits for one template
    #[serde(default = "default_exclusion_penalty")]
    pub exclusion_penalty: f64,

    /// Floor of the hard λ on the exactly-one-route constraint; raised above
    /// the combined span of every other term when that is larger
    #[serde(default = "default_routing_penalty")]
    pub routing_penalty: f64,

    /// Number of replicas each template must be routed to (`m`)
    #[serde(default = "default_routing_target")]
    pub routing_target: i64,

    /// Floor of the penalty enforcing auxiliary product variables; raised to
    /// `1 + Σ|c|` over the terms of degree > 2 when that is larger
    #[serde(default = "default_quadratization_strength")]
    pub quadratization_strength: f64,

    /// λ of the per-replica cost constraints (`None` = heuristic)
    #[serde(default)]
    pub replica_penalty: Option<f64>,

    /// λ of the storage budget constraints (`None` = heuristic)
    #[serde(default)]
    pub storage_penalty: Option<f64>,
}

fn default_objective_bound() -> i64 {
    500
}
fn default_exclusion_penalty() -> f64 {
    100.0
}
fn default_routing_penalty() -> f64 {
    1e12
}
fn default_routing_target() -> i64 {
    1
}
fn default_quadratization_strength() -> f64 {
    10_000.0
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            objective_bound: default_objective_bound(),
            exclusion_penalty: default_exclusion_penalty(),
            routing_penalty: default_routing_penalty(),
            routing_target: default_routing_target(),
            quadratization_strength: default_quadratization_strength(),
            replica_penalty: None,
            storage_penalty: None,
        }
    }
}

impl CompilerConfig {
    /// Validate every field
    pub fn validate(&self) -> CompileResult<()> {
        if self.objective_bound <= 0 {
            return Err(CompileError::configuration(format!(
                "objective_bound must be > 0, got {}",
                self.objective_bound
            )));
        }
        if self.routing_target < 1 {
            return Err(CompileError::configuration(format!(
                "routing_target must be >= 1, got {}",
                self.routing_target
            )));
        }

        let weights = [
            ("exclusion_penalty", Some(self.exclusion_penalty)),
            ("routing_penalty", Some(self.routing_penalty)),
            ("quadratization_strength", Some(self.quadratization_strength)),
            ("replica_penalty", self.replica_penalty),
            ("storage_penalty", self.storage_penalty),
        ];
        for (name, value) in weights {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(CompileError::configuration(format!(
                        "{} must be a positive finite number, got {}",
                        name, v
                    )));
                }
            }
        }

        Ok(())
    }
}
