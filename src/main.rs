//! qubo-advisor CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`; on failure prints the
//! error to stderr and exits non-zero. All logic lives in the library.

use qubo_advisor::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
