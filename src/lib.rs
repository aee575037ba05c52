//! qubo-advisor - index selection and query routing as a QUBO
//!
//! Compiles the choice of secondary indexes per replica and the routing of
//! query templates to replicas, under a per-replica storage budget, into one
//! Quadratic Unconstrained Binary Optimization problem, samples it, and
//! decodes the best sample back into an index configuration.
//!
//! Layers, bottom up:
//!
//! - `model`: variable keys, polynomials, quadratic models
//! - `workload`: problem instances and input normalization
//! - `compiler`: encoding, residuals, squaring, quadratization, penalties,
//!   assembly (pure, no I/O)
//! - `solver`: sampler trait with exact and annealing backends
//! - `decoder`: sample -> indexes, routes, warnings; result log
//! - `interchange`: JSON exchange with external solvers
//! - `advisor`: the end-to-end run, logged
//! - `observability`, `cli`

pub mod advisor;
pub mod cli;
pub mod compiler;
pub mod decoder;
pub mod interchange;
pub mod model;
pub mod observability;
pub mod solver;
pub mod workload;
