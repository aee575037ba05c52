//! CLI argument definitions using clap
//!
//! Commands:
//! - qubo-advisor compile --instance <path> [--config <path>] [--out <path>]
//! - qubo-advisor solve --instance <path> [--config <path>] [--exact] [--num-reads <n>] [--seed <n>]
//! - qubo-advisor decode --instance <path> --samples <path> [--config <path>] [--qubo <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// qubo-advisor - index selection and query routing as a QUBO
#[derive(Parser, Debug)]
#[command(name = "qubo-advisor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile an instance and export the QUBO without solving it
    Compile {
        /// Estimator output (JSON)
        #[arg(long)]
        instance: PathBuf,

        /// Configuration file; built-in defaults when absent
        #[arg(long)]
        config: Option<PathBuf>,

        /// Storage budget per replica in bytes, overriding the instance
        #[arg(short = 'w', long)]
        storage_budget: Option<f64>,

        /// Destination of the exported QUBO
        #[arg(long, default_value = "./qubo.json")]
        out: PathBuf,
    },

    /// Compile, sample and decode an instance
    Solve {
        /// Estimator output (JSON)
        #[arg(long)]
        instance: PathBuf,

        /// Configuration file; built-in defaults when absent
        #[arg(long)]
        config: Option<PathBuf>,

        /// Storage budget per replica in bytes, overriding the instance
        #[arg(short = 'w', long)]
        storage_budget: Option<f64>,

        /// Enumerate exhaustively instead of annealing
        #[arg(long)]
        exact: bool,

        /// Number of sampler reads
        #[arg(short = 'n', long)]
        num_reads: Option<usize>,

        /// Seed for reproducible annealing
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Decode samples produced by an external solver
    Decode {
        /// Estimator output (JSON) the samples were compiled from
        #[arg(long)]
        instance: PathBuf,

        /// Sample records (JSON)
        #[arg(long)]
        samples: PathBuf,

        /// Configuration file; built-in defaults when absent
        #[arg(long)]
        config: Option<PathBuf>,

        /// Storage budget per replica in bytes, overriding the instance
        #[arg(short = 'w', long)]
        storage_budget: Option<f64>,

        /// Exported QUBO to score samples against; recompiled when absent
        #[arg(long)]
        qubo: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
