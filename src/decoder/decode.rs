//! Sample decoding
//!
//! Unpacks the selection bits into per-replica index sets and the routing bits
//! into a routing table. A template whose routing bits are set on several
//! replicas is routed to the last of them and flagged; an unrouted template
//! and a replica over its storage budget are flagged too. Flags are warnings
//! on the result, never errors: a probabilistic solver may return a sample
//! that violates soft constraints.

use std::fmt;

use serde::Serialize;

use crate::model::VarKey;
use crate::solver::Sample;
use crate::workload::ProblemInstance;

use super::errors::{DecodeError, DecodeResult};

/// Soft-constraint violation found in a decoded sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeWarning {
    /// Routing bits set on more replicas than the routing target
    MultiRouted { template: usize, replicas: Vec<usize> },
    /// No routing bit set for the template
    Unrouted { template: usize },
    /// Selected indexes exceed the replica's storage budget
    BudgetExceeded { replica: usize, used: i64, budget: i64 },
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::MultiRouted { template, replicas } => write!(
                f,
                "query {} routed to multiple replicas {:?}",
                template, replicas
            ),
            DecodeWarning::Unrouted { template } => {
                write!(f, "query {} is not routed to any replica", template)
            }
            DecodeWarning::BudgetExceeded {
                replica,
                used,
                budget,
            } => write!(
                f,
                "replica {} uses {} storage units of a {} budget",
                replica, used, budget
            ),
        }
    }
}

/// Index configuration and routing recovered from one sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decoded {
    pub energy: f64,
    /// `indexes[replica]`: selected candidate positions, ascending
    pub indexes: Vec<Vec<usize>>,
    /// `routes[template]`: replica serving the template
    pub routes: Vec<Option<usize>>,
    /// `storage_used[replica]`: normalized storage of the selected indexes
    pub storage_used: Vec<i64>,
    pub warnings: Vec<DecodeWarning>,
}

impl Decoded {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// `replica,column` pairs separated by spaces, for benchmarking tooling
    pub fn index_string(&self, instance: &ProblemInstance) -> String {
        let candidates = instance.candidates();
        self.indexes
            .iter()
            .enumerate()
            .flat_map(|(r, selected)| {
                selected
                    .iter()
                    .map(move |i| format!("{},{}", r, candidates[*i].column))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Routing table as `[r0, r1, ...]`, `-1` for an unrouted template
    pub fn routing_table(&self) -> String {
        let cells: Vec<String> = self
            .routes
            .iter()
            .map(|route| match route {
                Some(r) => r.to_string(),
                None => "-1".to_string(),
            })
            .collect();
        format!("[{}]", cells.join(", "))
    }
}

/// Maps samples of a compiled instance back to indexes and routes
#[derive(Debug, Clone, Copy)]
pub struct SolutionDecoder<'a> {
    instance: &'a ProblemInstance,
    routing_target: usize,
}

impl<'a> SolutionDecoder<'a> {
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self {
            instance,
            routing_target: 1,
        }
    }

    /// Replicas a template may be routed to before it counts as multi-routed
    pub fn with_routing_target(mut self, routing_target: usize) -> Self {
        self.routing_target = routing_target.max(1);
        self
    }

    pub fn decode(&self, sample: &Sample) -> DecodeResult<Decoded> {
        let instance = self.instance;
        let mut indexes = Vec::with_capacity(instance.n_replicas());
        let mut storage_used = Vec::with_capacity(instance.n_replicas());
        let mut routed_to: Vec<Vec<usize>> = vec![Vec::new(); instance.n_templates()];
        let mut warnings = Vec::new();

        for r in 0..instance.n_replicas() {
            let mut selected = Vec::new();
            for i in 0..instance.n_candidates() {
                if bit(sample, VarKey::select(i, r))? {
                    selected.push(i);
                }
            }
            let used: i64 = selected.iter().map(|i| instance.cost(*i)).sum();
            if used > instance.storage_budget() {
                warnings.push(DecodeWarning::BudgetExceeded {
                    replica: r,
                    used,
                    budget: instance.storage_budget(),
                });
            }
            indexes.push(selected);
            storage_used.push(used);

            for (q, replicas) in routed_to.iter_mut().enumerate() {
                if bit(sample, VarKey::route(q, r))? {
                    replicas.push(r);
                }
            }
        }

        let mut routes = Vec::with_capacity(instance.n_templates());
        for (q, replicas) in routed_to.into_iter().enumerate() {
            match replicas.len() {
                0 => warnings.push(DecodeWarning::Unrouted { template: q }),
                n if n > self.routing_target => warnings.push(DecodeWarning::MultiRouted {
                    template: q,
                    replicas: replicas.clone(),
                }),
                _ => {}
            }
            routes.push(replicas.last().copied());
        }

        Ok(Decoded {
            energy: sample.energy,
            indexes,
            routes,
            storage_used,
            warnings,
        })
    }
}

fn bit(sample: &Sample, v: VarKey) -> DecodeResult<bool> {
    match sample.value(&v) {
        Some(value) => Ok(value == 1),
        None => Err(DecodeError::MissingVariable(v)),
    }
}
