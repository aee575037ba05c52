//! Solver adapter
//!
//! The compiled QUBO is handed to a black-box [`Sampler`], which returns
//! samples ordered by ascending energy. Two in-process backends are provided:
//!
//! - [`ExactSolver`]: exhaustive, the ground truth for small models
//! - [`SimulatedAnnealingSampler`]: heuristic, for realistic sizes
//!
//! External backends (hardware annealers, QAOA) are reached through the
//! interchange format instead.

mod anneal;
mod config;
mod errors;
mod exact;
mod indexed;
mod sample;

pub use anneal::SimulatedAnnealingSampler;
pub use config::{SolverConfig, SolverMode};
pub use errors::{SolverError, SolverResult};
pub use exact::{ExactSolver, DEFAULT_MAX_EXACT_VARIABLES};
pub use sample::{Sample, SampleSet};

use crate::model::QuadraticModel;

/// Draws low-energy samples from a binary quadratic model.
///
/// Samples are ordered by ascending energy; the first is the best found.
pub trait Sampler {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    fn sample(&self, model: &QuadraticModel, num_reads: usize) -> SolverResult<SampleSet>;
}
