//! Observable pipeline events
//!
//! Events are explicit and typed; the wire name is SCREAMING_SNAKE_CASE.
//! Stage boundaries (compile, solve) are `ObservationScope` lines, not events.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Input
    /// Raw estimator output divided down to QUBO units
    InstanceNormalized,
    /// A negative benefit was clamped to zero
    BenefitClamped,

    // Compilation
    /// Residual squared and quadratized for one constraint
    ConstraintBuilt,
    /// λ applied to one constraint
    PenaltyCalibrated,
    /// Auxiliary variables introduced across the model
    Quadratized,

    // Decoding
    DecodeComplete,
    /// Template routed to more replicas than allowed
    MultiRouteDetected,
    /// Template routed nowhere
    UnroutedTemplate,
    /// Replica storage over budget
    BudgetExceeded,
    ResultLogWritten,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::InstanceNormalized => "INSTANCE_NORMALIZED",
            Event::BenefitClamped => "BENEFIT_CLAMPED",
            Event::ConstraintBuilt => "CONSTRAINT_BUILT",
            Event::PenaltyCalibrated => "PENALTY_CALIBRATED",
            Event::Quadratized => "QUADRATIZED",
            Event::DecodeComplete => "DECODE_COMPLETE",
            Event::MultiRouteDetected => "MULTI_ROUTE_DETECTED",
            Event::UnroutedTemplate => "UNROUTED_TEMPLATE",
            Event::BudgetExceeded => "BUDGET_EXCEEDED",
            Event::ResultLogWritten => "RESULT_LOG_WRITTEN",
        }
    }

    /// Soft-constraint violations and input repairs are warnings
    pub fn severity(&self) -> Severity {
        match self {
            Event::BenefitClamped
            | Event::MultiRouteDetected
            | Event::UnroutedTemplate
            | Event::BudgetExceeded => Severity::Warn,
            Event::ConstraintBuilt | Event::PenaltyCalibrated => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
