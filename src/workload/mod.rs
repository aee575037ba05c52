//! Workload inputs consumed by the compiler
//!
//! The workload parser and the cost/benefit estimator live outside this crate.
//! Their output arrives as a [`RawInstance`] (raw cost units and bytes) and is
//! normalized into an immutable [`ProblemInstance`] with integral benefits,
//! costs and budget.

mod candidate;
mod instance;

pub use candidate::Candidate;
pub use instance::{normalize, NormalizationConfig, Normalized, ProblemInstance, RawInstance};
