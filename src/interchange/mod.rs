//! JSON interchange with external solvers
//!
//! Assembled models are exported as a digest-protected [`QuboDocument`];
//! samples produced elsewhere (hardware annealers, QAOA shot histograms) are
//! read back as [`SampleRecord`]s and decoded like in-process samples.

mod document;
mod errors;
mod samples;

pub use document::{export_model, import_model, QuboDocument};
pub use errors::{InterchangeError, InterchangeResult};
pub use samples::{import_samples, parse_samples, SampleRecord};
