//! Constraint-to-QUBO compiler
//!
//! Translates index selection and replica routing into one quadratic
//! objective over binary variables.
//!
//! # Pipeline
//!
//! 1. [`encoder`]: bounded integers as weighted bits (slack, objective)
//! 2. [`builder`]: one residual per constraint (equality, or inequality with
//!    slack)
//! 3. [`squarer`] + [`quadratize`]: exact `residual²`, reduced to degree 2
//! 4. [`penalty`]: λ-scaling, heuristic or constant
//! 5. [`assembler`]: summation into the final model
//!
//! Every step is pure and deterministic: no I/O, no logging, no shared state.
//! Two compilations of the same instance and configuration produce identical
//! models.

pub mod assembler;
pub mod builder;
pub mod encoder;
pub mod penalty;
pub mod quadratize;
pub mod squarer;

mod config;
mod errors;

pub use assembler::{
    assemble, compile, BitLayout, CalibratedConstraint, CompiledProblem, ConstraintKind,
    QuboAssembler,
};
pub use config::CompilerConfig;
pub use encoder::{encode, SlackEncoding};
pub use errors::{CompileError, CompileResult};
pub use penalty::{calibrate, dominating_lambda, heuristic_lambda, Penalty};
pub use quadratize::{Quadratizer, SubstitutionQuadratizer};
pub use squarer::square;
