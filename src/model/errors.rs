//! Model error types

use thiserror::Error;

use super::Vartype;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while manipulating polynomials and quadratic models
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Operation requires a binary model
    #[error("expected a BINARY model, found {0}")]
    NotBinary(Vartype),

    /// Two models with different variable domains were combined
    #[error("cannot combine a {left} model with a {right} model")]
    VartypeMismatch { left: Vartype, right: Vartype },

    /// A polynomial term exceeds degree two
    #[error("term '{term}' has degree {degree}; a quadratic model allows at most 2")]
    DegreeTooHigh { term: String, degree: usize },

    /// A coefficient is NaN or infinite
    #[error("non-finite coefficient on '{0}'")]
    NonFinite(String),

    /// A serialized variable name could not be parsed
    #[error("invalid variable name '{0}'")]
    InvalidVariableName(String),
}

impl ModelError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::InvalidVariableName(_) => "QUBO_INVALID_VARIABLE_NAME",
            _ => "QUBO_DOMAIN_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_codes() {
        assert_eq!(ModelError::NotBinary(Vartype::Spin).code(), "QUBO_DOMAIN_ERROR");
        assert_eq!(
            ModelError::InvalidVariableName("q".into()).code(),
            "QUBO_INVALID_VARIABLE_NAME"
        );
    }

    #[test]
    fn test_display_mentions_vartypes() {
        let err = ModelError::VartypeMismatch {
            left: Vartype::Binary,
            right: Vartype::Spin,
        };
        let display = err.to_string();
        assert!(display.contains("BINARY"));
        assert!(display.contains("SPIN"));
    }
}
