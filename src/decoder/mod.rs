//! Solution decoding
//!
//! Turns the best sample of a run into per-replica index sets and a routing
//! table, and persists the raw result for benchmarking.

mod decode;
mod errors;
mod result_log;

pub use decode::{DecodeWarning, Decoded, SolutionDecoder};
pub use errors::{DecodeError, DecodeResult};
pub use result_log::{render_result, write_result_log, DEFAULT_RESULT_LOG};
