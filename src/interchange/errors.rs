//! Interchange error types
//!
//! Error codes:
//! - QUBO_INTERCHANGE_FORMAT (malformed JSON)
//! - QUBO_INTERCHANGE_IO (file could not be read or written)
//! - QUBO_INVALID_VARIABLE_NAME (name does not parse back into a variable key)
//! - QUBO_INTERCHANGE_DIGEST (document body does not match its digest)
//! - QUBO_INTERCHANGE_VALUE (sample value outside the model's domain)

use std::io;

use thiserror::Error;

use crate::model::ModelError;

/// Result type for interchange operations
pub type InterchangeResult<T> = Result<T, InterchangeError>;

#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("malformed document: {0}")]
    Format(#[from] serde_json::Error),

    #[error("interchange I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("digest mismatch: document says {expected}, body hashes to {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("variable '{variable}' has value {value}, expected 0 or 1")]
    InvalidValue { variable: String, value: i64 },
}

impl InterchangeError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            InterchangeError::Format(_) => "QUBO_INTERCHANGE_FORMAT",
            InterchangeError::Io(_) => "QUBO_INTERCHANGE_IO",
            InterchangeError::Model(e) => e.code(),
            InterchangeError::DigestMismatch { .. } => "QUBO_INTERCHANGE_DIGEST",
            InterchangeError::InvalidValue { .. } => "QUBO_INTERCHANGE_VALUE",
        }
    }
}
