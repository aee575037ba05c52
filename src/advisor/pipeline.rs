//! Optimization run: normalize -> compile -> sample -> decode
//!
//! Every run gets a fresh v4 run id that tags all of its log lines. The
//! sampler call is the only step that may take long; everything around it is
//! pure and deterministic.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::compiler::{CompiledProblem, CompilerConfig, QuboAssembler};
use crate::decoder::{write_result_log, DecodeWarning, Decoded, SolutionDecoder};
use crate::observability::{log_event, Event, ObservationScope};
use crate::solver::{SampleSet, SolverConfig};
use crate::workload::{normalize, NormalizationConfig, ProblemInstance, RawInstance};

use super::errors::{AdvisorError, AdvisorResult};

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub run_id: Uuid,
    pub compiled: CompiledProblem,
    pub samples: SampleSet,
    pub decoded: Decoded,
}

/// Drives one optimization run end to end
#[derive(Debug, Clone)]
pub struct IndexAdvisor {
    compiler: CompilerConfig,
    solver: SolverConfig,
    result_log: Option<PathBuf>,
    run_id: Uuid,
}

impl IndexAdvisor {
    /// Validates both configurations up front
    pub fn new(compiler: CompilerConfig, solver: SolverConfig) -> AdvisorResult<Self> {
        compiler.validate()?;
        solver.validate()?;
        Ok(Self {
            compiler,
            solver,
            result_log: None,
            run_id: Uuid::new_v4(),
        })
    }

    /// Write the winning sample to `path` after decoding
    pub fn with_result_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.result_log = Some(path.into());
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn compiler_config(&self) -> &CompilerConfig {
        &self.compiler
    }

    /// Normalize estimator output, reporting clamped benefits
    pub fn normalize(
        &self,
        raw: &RawInstance,
        config: &NormalizationConfig,
    ) -> AdvisorResult<ProblemInstance> {
        let run_id = self.run_id.to_string();
        let normalized = normalize(raw, config)?;
        for (candidate, template) in &normalized.clamped {
            log_event(
                Event::BenefitClamped,
                &[
                    ("candidate", &candidate.to_string()),
                    ("run_id", &run_id),
                    ("template", &template.to_string()),
                ],
            );
        }
        let instance = normalized.instance;
        log_event(
            Event::InstanceNormalized,
            &[
                ("candidates", &instance.n_candidates().to_string()),
                ("replicas", &instance.n_replicas().to_string()),
                ("run_id", &run_id),
                ("storage_budget", &instance.storage_budget().to_string()),
                ("templates", &instance.n_templates().to_string()),
            ],
        );
        Ok(instance)
    }

    pub fn compile(&self, instance: &ProblemInstance) -> AdvisorResult<CompiledProblem> {
        let run_id = self.run_id.to_string();
        let scope = ObservationScope::with_fields("COMPILE", &[("run_id", &run_id)]);

        let compiled = match QuboAssembler::new(self.compiler.clone())
            .and_then(|assembler| assembler.compile(instance))
        {
            Ok(compiled) => compiled,
            Err(e) => {
                scope.fail(&e.to_string());
                return Err(e.into());
            }
        };

        for constraint in &compiled.constraints {
            let label = constraint.kind.label();
            log_event(
                Event::ConstraintBuilt,
                &[
                    ("auxiliaries", &constraint.auxiliaries().to_string()),
                    ("constraint", &label),
                    ("interactions", &constraint.model.num_interactions().to_string()),
                    ("run_id", &run_id),
                ],
            );
            log_event(
                Event::PenaltyCalibrated,
                &[
                    ("constraint", &label),
                    ("heuristic", &constraint.penalty.is_heuristic().to_string()),
                    ("lambda", &constraint.lambda.to_string()),
                    ("run_id", &run_id),
                ],
            );
        }
        log_event(
            Event::Quadratized,
            &[
                ("auxiliaries", &compiled.num_auxiliaries().to_string()),
                ("run_id", &run_id),
            ],
        );

        scope.complete_with_fields(&[
            ("interactions", &compiled.model.num_interactions().to_string()),
            ("variables", &compiled.layout.len().to_string()),
        ]);
        Ok(compiled)
    }

    /// The single call into the sampler
    pub fn solve(&self, compiled: &CompiledProblem) -> AdvisorResult<SampleSet> {
        let run_id = self.run_id.to_string();
        let sampler = self.solver.build()?;
        let scope = ObservationScope::with_fields(
            "SOLVE",
            &[("run_id", &run_id), ("sampler", sampler.name())],
        );

        match sampler.sample(&compiled.model, self.solver.num_reads) {
            Ok(samples) => {
                let best = samples
                    .first()
                    .map(|s| s.energy.to_string())
                    .unwrap_or_default();
                scope.complete_with_fields(&[
                    ("best_energy", &best),
                    ("samples", &samples.len().to_string()),
                ]);
                Ok(samples)
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e.into())
            }
        }
    }

    /// Decode the lowest-energy sample and report soft violations
    pub fn decode(&self, instance: &ProblemInstance, samples: &SampleSet) -> AdvisorResult<Decoded> {
        let run_id = self.run_id.to_string();
        let best = samples.first().ok_or(AdvisorError::NoSamples)?;
        let decoded = SolutionDecoder::new(instance)
            .with_routing_target(self.compiler.routing_target as usize)
            .decode(best)?;

        for warning in &decoded.warnings {
            report(warning, &run_id);
        }
        log_event(
            Event::DecodeComplete,
            &[
                ("energy", &decoded.energy.to_string()),
                ("run_id", &run_id),
                ("warnings", &decoded.warnings.len().to_string()),
            ],
        );

        if let Some(path) = &self.result_log {
            write_result_log(path, best, self.run_id)?;
            log_event(
                Event::ResultLogWritten,
                &[("path", &display(path)), ("run_id", &run_id)],
            );
        }
        Ok(decoded)
    }

    pub fn run(&self, instance: &ProblemInstance) -> AdvisorResult<Recommendation> {
        let compiled = self.compile(instance)?;
        let samples = self.solve(&compiled)?;
        let decoded = self.decode(instance, &samples)?;
        Ok(Recommendation {
            run_id: self.run_id,
            compiled,
            samples,
            decoded,
        })
    }
}

fn report(warning: &DecodeWarning, run_id: &str) {
    match warning {
        DecodeWarning::MultiRouted { template, replicas } => log_event(
            Event::MultiRouteDetected,
            &[
                ("replicas", &format!("{:?}", replicas)),
                ("run_id", run_id),
                ("template", &template.to_string()),
            ],
        ),
        DecodeWarning::Unrouted { template } => log_event(
            Event::UnroutedTemplate,
            &[("run_id", run_id), ("template", &template.to_string())],
        ),
        DecodeWarning::BudgetExceeded {
            replica,
            used,
            budget,
        } => log_event(
            Event::BudgetExceeded,
            &[
                ("budget", &budget.to_string()),
                ("replica", &replica.to_string()),
                ("run_id", run_id),
                ("used", &used.to_string()),
            ],
        ),
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
