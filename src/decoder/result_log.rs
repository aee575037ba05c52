//! Result log
//!
//! Textual dump of the winning sample for downstream benchmarking tooling.
//! The body is the sample's `Display` form; it is not meant to be parsed back.

use std::fs;
use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use crate::solver::Sample;

use super::errors::DecodeResult;

/// Default file name of the result log
pub const DEFAULT_RESULT_LOG: &str = "output.log";

/// Render the log body: one header line, then the sample
pub fn render_result(sample: &Sample, run_id: Uuid) -> String {
    format!(
        "# run {} at {}\n{}\n",
        run_id,
        Utc::now().to_rfc3339(),
        sample
    )
}

/// Overwrite `path` with the rendered result
pub fn write_result_log(path: &Path, sample: &Sample, run_id: Uuid) -> DecodeResult<()> {
    fs::write(path, render_result(sample, run_id))?;
    Ok(())
}
