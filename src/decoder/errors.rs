//! Decoder error types
//!
//! Soft-constraint violations are not errors; see `DecodeWarning`.
//!
//! Error codes:
//! - QUBO_DECODE_MISSING_VARIABLE (sample does not cover the bit layout)
//! - QUBO_DECODE_IO (result log could not be written)

use std::io;

use thiserror::Error;

use crate::model::VarKey;

/// Result type for decoder operations
pub type DecodeResult<T> = Result<T, DecodeError>;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// Sample has no value for a decision bit
    #[error("sample has no value for '{0}'")]
    MissingVariable(VarKey),

    /// Result log write failed
    #[error("result log I/O failed: {0}")]
    Io(#[from] io::Error),
}

impl DecodeError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::MissingVariable(_) => "QUBO_DECODE_MISSING_VARIABLE",
            DecodeError::Io(_) => "QUBO_DECODE_IO",
        }
    }
}
