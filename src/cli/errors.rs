//! CLI-specific error types
//!
//! Every CLI error is fatal: `main` prints it to stderr and exits non-zero.
//! Subsystem failures keep their own code in the message.

use std::fmt;
use std::io;

use crate::advisor::AdvisorError;
use crate::compiler::CompileError;
use crate::decoder::DecodeError;
use crate::interchange::InterchangeError;
use crate::solver::SolverError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file missing, malformed or invalid
    ConfigError,
    /// Instance or sample file unreadable
    IoError,
    /// Normalization or compilation failed
    CompileFailed,
    /// Sampler failed
    SolveFailed,
    /// Decoding or result log failed
    DecodeFailed,
    /// Import or export of an interchange document failed
    InterchangeFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "QUBO_CLI_CONFIG_ERROR",
            Self::IoError => "QUBO_CLI_IO_ERROR",
            Self::CompileFailed => "QUBO_CLI_COMPILE_FAILED",
            Self::SolveFailed => "QUBO_CLI_SOLVE_FAILED",
            Self::DecodeFailed => "QUBO_CLI_DECODE_FAILED",
            Self::InterchangeFailed => "QUBO_CLI_INTERCHANGE_FAILED",
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn tagged(code: CliErrorCode, inner: &'static str, message: impl fmt::Display) -> Self {
        Self::new(code, format!("[{}] {}", inner, message))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<CompileError> for CliError {
    fn from(e: CompileError) -> Self {
        let code = match e {
            CompileError::Configuration(_) => CliErrorCode::ConfigError,
            _ => CliErrorCode::CompileFailed,
        };
        Self::tagged(code, e.code(), &e)
    }
}

impl From<SolverError> for CliError {
    fn from(e: SolverError) -> Self {
        Self::tagged(CliErrorCode::SolveFailed, e.code(), &e)
    }
}

impl From<DecodeError> for CliError {
    fn from(e: DecodeError) -> Self {
        Self::tagged(CliErrorCode::DecodeFailed, e.code(), &e)
    }
}

impl From<InterchangeError> for CliError {
    fn from(e: InterchangeError) -> Self {
        Self::tagged(CliErrorCode::InterchangeFailed, e.code(), &e)
    }
}

impl From<AdvisorError> for CliError {
    fn from(e: AdvisorError) -> Self {
        match e {
            AdvisorError::Compile(e) => e.into(),
            AdvisorError::Solver(e) => e.into(),
            AdvisorError::Decode(e) => e.into(),
            other => Self::tagged(CliErrorCode::SolveFailed, other.code(), &other),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_configuration_maps_to_config_error() {
        let err: CliError = CompileError::configuration("bound must be positive").into();
        assert_eq!(err.code(), CliErrorCode::ConfigError);
        assert!(err.to_string().starts_with("QUBO_CLI_CONFIG_ERROR"));
        assert!(err.message().contains("QUBO_CONFIGURATION_ERROR"));
    }

    #[test]
    fn test_advisor_errors_unwrap_to_stage() {
        let err: CliError = AdvisorError::Solver(SolverError::unavailable("too big")).into();
        assert_eq!(err.code_str(), "QUBO_CLI_SOLVE_FAILED");
        assert!(err.message().contains("QUBO_SOLVER_UNAVAILABLE"));
    }
}
