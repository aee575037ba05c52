//! Observability
//!
//! - Structured JSON-lines logging ([`Logger`])
//! - Typed pipeline events ([`Event`])
//! - Stage scopes with begin/complete/failed lines ([`ObservationScope`])
//!
//! Logging is read-only with respect to the pipeline: a failed log write never
//! changes a result. The compiler core does not log; the advisor and the CLI
//! wrap it.

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

/// Log an event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event(Event::InstanceNormalized, &[("run_id", "test")]);
        log_event(Event::UnroutedTemplate, &[("template", "0")]);
    }
}
