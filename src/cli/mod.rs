//! CLI module for qubo-advisor
//!
//! Provides command-line interface for:
//! - compile: Normalize an instance and export its QUBO (dry run)
//! - solve: Compile, sample and decode an instance
//! - decode: Decode samples produced by an external solver

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{compile, decode, load_instance, render_report, run, run_command, solve, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
