//! Advisor error types

use thiserror::Error;

use crate::compiler::CompileError;
use crate::decoder::DecodeError;
use crate::solver::SolverError;

/// Result type for advisor operations
pub type AdvisorResult<T> = Result<T, AdvisorError>;

/// Failure of one stage of an optimization run
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Sampler returned an empty sample set
    #[error("solver returned no samples")]
    NoSamples,
}

impl AdvisorError {
    /// Returns the stable error code of the failing stage
    pub fn code(&self) -> &'static str {
        match self {
            AdvisorError::Compile(e) => e.code(),
            AdvisorError::Solver(e) => e.code(),
            AdvisorError::Decode(e) => e.code(),
            AdvisorError::NoSamples => "QUBO_SOLVER_UNAVAILABLE",
        }
    }
}
