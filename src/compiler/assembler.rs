//! QUBO assembly
//!
//! The assembled problem is a pure sum of:
//!
//! - the objective: binary-encoded bound `z` on the worst replica cost,
//! - one cost constraint per replica (squared, quadratized, heuristic λ),
//! - one exactly-one-route constraint per template (squared, hard λ above the
//!   combined span of every other term),
//! - one storage budget constraint per replica (slack inequality, squared,
//!   heuristic λ),
//! - the cross-replica mutual exclusion on routing bits (weight `C`).
//!
//! Contributions are keyed by variable identity and never renamed. Variables
//! whose biases cancel stay in the result, so the bit layout is stable.

use crate::model::{QuadraticModel, VarKey};
use crate::workload::ProblemInstance;

use super::builder;
use super::config::CompilerConfig;
use super::encoder::SlackEncoding;
use super::errors::{CompileError, CompileResult};
use super::penalty::{dominating_lambda, Penalty};
use super::quadratize::{Quadratizer, SubstitutionQuadratizer};
use super::squarer::square;

/// Sum `objective` and every constraint model into one QUBO
pub fn assemble(
    objective: &QuadraticModel,
    constraints: &[QuadraticModel],
) -> CompileResult<QuadraticModel> {
    let mut combined = objective.clone();
    for constraint in constraints {
        combined.add_model(constraint)?;
    }
    Ok(combined)
}

/// Logical constraint a calibrated model enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    ReplicaCost { replica: usize },
    RoutingCompleteness { template: usize },
    StorageBudget { replica: usize },
    MutualExclusion,
}

impl ConstraintKind {
    /// Hard constraints must hold in every low-energy sample
    pub fn is_hard(&self) -> bool {
        matches!(self, ConstraintKind::RoutingCompleteness { .. })
    }

    pub fn label(&self) -> String {
        match self {
            ConstraintKind::ReplicaCost { replica } => format!("replica_cost[r{}]", replica),
            ConstraintKind::RoutingCompleteness { template } => {
                format!("routing_completeness[q{}]", template)
            }
            ConstraintKind::StorageBudget { replica } => format!("storage_budget[r{}]", replica),
            ConstraintKind::MutualExclusion => "mutual_exclusion".to_string(),
        }
    }
}

/// One constraint after squaring, quadratization and calibration
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedConstraint {
    pub kind: ConstraintKind,
    pub penalty: Penalty,
    /// λ actually applied
    pub lambda: f64,
    pub model: QuadraticModel,
}

impl CalibratedConstraint {
    /// Auxiliary product variables introduced for this constraint
    pub fn auxiliaries(&self) -> usize {
        self.model.variables().filter(|v| v.is_auxiliary()).count()
    }
}

/// Stable, ordered list of every bit of an assembled QUBO
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitLayout {
    variables: Vec<VarKey>,
}

impl BitLayout {
    pub fn from_model(model: &QuadraticModel) -> Self {
        Self {
            variables: model.variables().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VarKey> {
        self.variables.iter()
    }

    pub fn position(&self, v: &VarKey) -> Option<usize> {
        self.variables.binary_search(v).ok()
    }

    /// Decision bits only (auxiliary products excluded)
    pub fn decision_variables(&self) -> impl Iterator<Item = &VarKey> {
        self.variables.iter().filter(|v| !v.is_auxiliary())
    }
}

/// Output of [`QuboAssembler::compile`]
#[derive(Debug, Clone)]
pub struct CompiledProblem {
    pub model: QuadraticModel,
    pub objective: SlackEncoding,
    pub constraints: Vec<CalibratedConstraint>,
    pub layout: BitLayout,
}

impl CompiledProblem {
    pub fn num_auxiliaries(&self) -> usize {
        self.layout.iter().filter(|v| v.is_auxiliary()).count()
    }
}

/// Compiles a [`ProblemInstance`] into one assembled QUBO
#[derive(Debug, Clone)]
pub struct QuboAssembler<Q: Quadratizer = SubstitutionQuadratizer> {
    config: CompilerConfig,
    quadratizer: Q,
}

impl QuboAssembler<SubstitutionQuadratizer> {
    /// Assembler using reduction by substitution at the configured strength
    pub fn new(config: CompilerConfig) -> CompileResult<Self> {
        config.validate()?;
        let quadratizer = SubstitutionQuadratizer::new(config.quadratization_strength)?;
        Ok(Self {
            config,
            quadratizer,
        })
    }
}

impl<Q: Quadratizer> QuboAssembler<Q> {
    pub fn with_quadratizer(config: CompilerConfig, quadratizer: Q) -> CompileResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            quadratizer,
        })
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn compile(&self, instance: &ProblemInstance) -> CompileResult<CompiledProblem> {
        let m = self.config.routing_target;
        if m as usize > instance.n_replicas() {
            return Err(CompileError::configuration(format!(
                "routing_target {} exceeds the {} available replicas",
                m,
                instance.n_replicas()
            )));
        }

        let (objective, encoding) = builder::objective(self.config.objective_bound)?;

        let mut replica_costs = Vec::with_capacity(instance.n_replicas());
        for r in 0..instance.n_replicas() {
            let residual = builder::replica_cost_residual(instance, r, &encoding, m)?;
            replica_costs.push(self.penalize(
                ConstraintKind::ReplicaCost { replica: r },
                &residual,
                Penalty::from_option(self.config.replica_penalty),
            )?);
        }

        let mut soft = Vec::with_capacity(instance.n_replicas() + 1);
        for r in 0..instance.n_replicas() {
            let residual = builder::storage_residual(instance, r)?;
            soft.push(self.penalize(
                ConstraintKind::StorageBudget { replica: r },
                &residual,
                Penalty::from_option(self.config.storage_penalty),
            )?);
        }

        if instance.n_replicas() > 1 && instance.n_templates() > 0 {
            let mut model = builder::mutual_exclusion(instance);
            let penalty = Penalty::Constant(self.config.exclusion_penalty);
            let lambda = penalty.apply(&mut model)?;
            soft.push(CalibratedConstraint {
                kind: ConstraintKind::MutualExclusion,
                penalty,
                lambda,
                model,
            });
        }

        // routing_penalty is a floor; λ must outweigh every soft term
        let hard_lambda = dominating_lambda(
            std::iter::once(&objective)
                .chain(replica_costs.iter().map(|c| &c.model))
                .chain(soft.iter().map(|c| &c.model)),
            self.config.routing_penalty,
        )?;

        let mut constraints = replica_costs;
        for q in 0..instance.n_templates() {
            let residual = builder::routing_residual(instance, q, m);
            constraints.push(self.penalize(
                ConstraintKind::RoutingCompleteness { template: q },
                &residual,
                Penalty::Constant(hard_lambda),
            )?);
        }
        constraints.extend(soft);

        let models: Vec<QuadraticModel> = constraints.iter().map(|c| c.model.clone()).collect();
        let model = assemble(&objective, &models)?;
        let layout = BitLayout::from_model(&model);

        Ok(CompiledProblem {
            model,
            objective: encoding,
            constraints,
            layout,
        })
    }

    /// residual -> residual² -> quadratic form -> λ·form
    fn penalize(
        &self,
        kind: ConstraintKind,
        residual: &QuadraticModel,
        penalty: Penalty,
    ) -> CompileResult<CalibratedConstraint> {
        let squared = square(residual)?;
        let mut model = self.quadratizer.quadratize(&squared)?;
        let lambda = penalty.apply(&mut model)?;
        Ok(CalibratedConstraint {
            kind,
            penalty,
            lambda,
            model,
        })
    }
}

/// Compile with the default substitution quadratizer
pub fn compile(instance: &ProblemInstance, config: &CompilerConfig) -> CompileResult<CompiledProblem> {
    QuboAssembler::new(config.clone())?.compile(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::Candidate;

    fn instance(n_replicas: usize) -> ProblemInstance {
        ProblemInstance::new(
            vec![Candidate::new("a", "t"), Candidate::new("b", "t")],
            2,
            n_replicas,
            vec![vec![10, 0], vec![0, 5]],
            vec![1, 1],
            vec![10, 5],
            1,
        )
        .unwrap()
    }

    fn small_config() -> CompilerConfig {
        CompilerConfig {
            objective_bound: 16,
            ..CompilerConfig::default()
        }
    }

    #[test]
    fn test_assemble_sums_offsets_and_biases() {
        let mut a = QuadraticModel::binary();
        a.add_linear(VarKey::select(0, 0), 1.0);
        a.set_offset(2.0);
        let mut b = QuadraticModel::binary();
        b.add_linear(VarKey::select(0, 0), 3.0);
        b.add_quadratic(VarKey::select(0, 0), VarKey::route(0, 0), -1.0);
        b.set_offset(1.0);

        let sum = assemble(&a, &[b]).unwrap();
        assert_eq!(sum.offset(), 3.0);
        assert_eq!(sum.get_linear(&VarKey::select(0, 0)), Some(4.0));
        assert_eq!(
            sum.get_quadratic(&VarKey::select(0, 0), &VarKey::route(0, 0)),
            Some(-1.0)
        );
    }

    #[test]
    fn test_constraint_inventory() {
        let compiled = compile(&instance(2), &small_config()).unwrap();
        let kinds: Vec<ConstraintKind> = compiled.constraints.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ConstraintKind::ReplicaCost { replica: 0 },
                ConstraintKind::ReplicaCost { replica: 1 },
                ConstraintKind::RoutingCompleteness { template: 0 },
                ConstraintKind::RoutingCompleteness { template: 1 },
                ConstraintKind::StorageBudget { replica: 0 },
                ConstraintKind::StorageBudget { replica: 1 },
                ConstraintKind::MutualExclusion,
            ]
        );
    }

    #[test]
    fn test_single_replica_has_no_exclusion() {
        let compiled = compile(&instance(1), &small_config()).unwrap();
        assert!(compiled
            .constraints
            .iter()
            .all(|c| c.kind != ConstraintKind::MutualExclusion));
    }

    #[test]
    fn test_routing_uses_hard_penalty() {
        let compiled = compile(&instance(1), &small_config()).unwrap();
        let routing = compiled
            .constraints
            .iter()
            .find(|c| c.kind.is_hard())
            .unwrap();
        assert!(routing.lambda >= 1e12);
        assert!(!routing.penalty.is_heuristic());

        let soft_span: f64 = compiled
            .constraints
            .iter()
            .filter(|c| !c.kind.is_hard())
            .map(|c| c.model.bias_span())
            .sum::<f64>()
            + compiled.objective.to_model().bias_span();
        assert!(routing.lambda > soft_span);
    }

    #[test]
    fn test_hard_penalty_outgrows_large_baseline() {
        // unrouted costs nothing soft; routed leaves a residual of ~2000
        let instance = ProblemInstance::new(
            vec![Candidate::new("a", "t")],
            1,
            1,
            vec![vec![0]],
            vec![1],
            vec![2000],
            2,
        )
        .unwrap();
        let compiled = compile(&instance, &small_config()).unwrap();
        let routing = compiled
            .constraints
            .iter()
            .find(|c| c.kind.is_hard())
            .unwrap();
        let replica = compiled
            .constraints
            .iter()
            .find(|c| c.kind == ConstraintKind::ReplicaCost { replica: 0 })
            .unwrap();
        assert!(replica.model.bias_span() > 1e12);
        assert!(routing.lambda > replica.model.bias_span());
    }

    #[test]
    fn test_layout_covers_every_decision_bit() {
        let compiled = compile(&instance(2), &small_config()).unwrap();
        for r in 0..2 {
            for i in 0..2 {
                assert!(compiled.layout.position(&VarKey::select(i, r)).is_some());
            }
            for q in 0..2 {
                assert!(compiled.layout.position(&VarKey::route(q, r)).is_some());
            }
        }
        assert!(compiled.num_auxiliaries() > 0);
    }

    #[test]
    fn test_routing_target_above_replica_count_rejected() {
        let config = CompilerConfig {
            routing_target: 3,
            ..small_config()
        };
        let err = compile(&instance(2), &config).unwrap_err();
        assert_eq!(err.code(), "QUBO_CONFIGURATION_ERROR");
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let a = compile(&instance(2), &small_config()).unwrap();
        let b = compile(&instance(2), &small_config()).unwrap();
        assert_eq!(a.model, b.model);
        assert_eq!(a.layout, b.layout);
    }
}
