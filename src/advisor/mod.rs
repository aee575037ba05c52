//! End-to-end index advisor
//!
//! Wraps the pure compiler with logging, the sampler call and decoding.

mod errors;
mod pipeline;

pub use errors::{AdvisorError, AdvisorResult};
pub use pipeline::{IndexAdvisor, Recommendation};
