//! Compiler error types
//!
//! Error codes:
//! - QUBO_CONFIGURATION_ERROR (non-positive bound, invalid config field)
//! - QUBO_DOMAIN_ERROR (non-binary or non-finite input)
//! - QUBO_DEGENERATE_MODEL (penalty derived from a model without coefficients)
//! - QUBO_INVALID_INSTANCE (benefit/cost dimensions disagree)

use thiserror::Error;

use crate::model::ModelError;

/// Result type for compiler operations
pub type CompileResult<T> = Result<T, CompileError>;

/// Failures of the constraint-to-QUBO compilation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A bound, penalty or other configuration value is unusable
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Input is not a finite binary model
    #[error("domain error: {0}")]
    Domain(String),

    /// Penalty calibration has no coefficient to derive a weight from
    #[error("degenerate model: {0}")]
    DegenerateModel(String),

    /// Problem instance is internally inconsistent
    #[error("invalid instance: {0}")]
    InvalidInstance(String),
}

impl CompileError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn invalid_instance(message: impl Into<String>) -> Self {
        Self::InvalidInstance(message.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::Configuration(_) => "QUBO_CONFIGURATION_ERROR",
            CompileError::Domain(_) => "QUBO_DOMAIN_ERROR",
            CompileError::DegenerateModel(_) => "QUBO_DEGENERATE_MODEL",
            CompileError::InvalidInstance(_) => "QUBO_INVALID_INSTANCE",
        }
    }
}

impl From<ModelError> for CompileError {
    fn from(e: ModelError) -> Self {
        CompileError::Domain(e.to_string())
    }
}
