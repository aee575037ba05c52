//! Solver error types
//!
//! Error codes:
//! - QUBO_SOLVER_UNAVAILABLE (backend cannot serve the request)
//! - QUBO_SOLVER_INVALID_MODEL (model outside the backend's domain)

use thiserror::Error;

use crate::model::ModelError;

/// Result type for solver operations
pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// Backend refused the request (too many variables, zero reads, bad schedule)
    #[error("solver unavailable: {0}")]
    Unavailable(String),

    /// Model cannot be sampled by this backend
    #[error("invalid model: {0}")]
    InvalidModel(String),
}

impl SolverError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::Unavailable(_) => "QUBO_SOLVER_UNAVAILABLE",
            SolverError::InvalidModel(_) => "QUBO_SOLVER_INVALID_MODEL",
        }
    }
}

impl From<ModelError> for SolverError {
    fn from(e: ModelError) -> Self {
        SolverError::InvalidModel(e.to_string())
    }
}
