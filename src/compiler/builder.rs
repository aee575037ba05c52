//! Constraint model builder
//!
//! Constraints are expressed as residuals: linear or quadratic binary models
//! that evaluate to zero exactly when the constraint holds. Two strategies:
//!
//! 1. Equality-as-residual: `g(x) = rhs` becomes `g(x) - rhs`.
//! 2. Inequality-as-residual-plus-slack: `Σ w_i x_i ≤ W` becomes
//!    `W - Σ w_i x_i - slack` with a binary-encoded slack.
//!
//! Builders never mutate the objective. The per-replica cost residual imports
//! the objective's bits by identity, which is what ties every replica to the
//! shared objective encoding.

use crate::model::{QuadraticModel, SlackSpace, VarKey};
use crate::workload::ProblemInstance;

use super::encoder::{encode, SlackEncoding};
use super::errors::CompileResult;

/// Accumulates the terms of one residual
#[derive(Debug, Clone, Default)]
pub struct ResidualBuilder {
    model: QuadraticModel,
}

impl ResidualBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(mut self, value: f64) -> Self {
        self.model.add_offset(value);
        self
    }

    pub fn term(mut self, v: VarKey, coefficient: f64) -> Self {
        self.model.add_linear(v, coefficient);
        self
    }

    pub fn interaction(mut self, u: VarKey, v: VarKey, coefficient: f64) -> Self {
        self.model.add_quadratic(u, v, coefficient);
        self
    }

    /// Registers `v` without contributing to the residual
    pub fn variable(mut self, v: VarKey) -> Self {
        self.model.add_variable(v);
        self
    }

    /// Adds `sign · Σ_j 2^j b_j`
    pub fn encoding(mut self, encoding: &SlackEncoding, sign: f64) -> Self {
        for (v, weight) in encoding.bits() {
            self.model.add_linear(v.clone(), sign * weight);
        }
        self
    }

    pub fn build(self) -> QuadraticModel {
        self.model
    }
}

/// `Σ w_i x_i - rhs`
pub fn equality(terms: impl IntoIterator<Item = (VarKey, f64)>, rhs: f64) -> QuadraticModel {
    terms
        .into_iter()
        .fold(ResidualBuilder::new().constant(-rhs), |b, (v, w)| b.term(v, w))
        .build()
}

/// `bound - Σ w_i x_i - slack`, with the slack encoded in `space`
pub fn inequality_le(
    terms: impl IntoIterator<Item = (VarKey, f64)>,
    bound: i64,
    space: SlackSpace,
) -> CompileResult<(QuadraticModel, SlackEncoding)> {
    let slack = encode(space, bound)?;
    let residual = terms
        .into_iter()
        .fold(ResidualBuilder::new().constant(bound as f64), |b, (v, w)| {
            b.term(v, -w)
        })
        .encoding(&slack, -1.0)
        .build();
    Ok((residual, slack))
}

/// Shared objective: the binary-encoded bound on the worst replica cost
pub fn objective(bound: i64) -> CompileResult<(QuadraticModel, SlackEncoding)> {
    let encoding = encode(SlackSpace::Objective, bound)?;
    Ok((encoding.to_model(), encoding))
}

/// Cost residual of one replica:
///
/// `Σ_q f_q c_q t_q / m - Σ_{i,q} f_q v_iq x_i t_q / m - z + s_r`
///
/// Zero iff the objective value `z` equals the replica's routed cost plus a
/// non-negative slack, i.e. `z` bounds the replica cost. Interactions are only
/// materialized for non-zero benefits, but every selection and routing bit of
/// the replica is registered.
pub fn replica_cost_residual(
    instance: &ProblemInstance,
    replica: usize,
    objective: &SlackEncoding,
    routing_target: i64,
) -> CompileResult<QuadraticModel> {
    let m = routing_target as f64;
    let slack = encode(SlackSpace::ReplicaCost { replica }, objective.bound())?;

    let mut builder = ResidualBuilder::new();
    for i in 0..instance.n_candidates() {
        builder = builder.variable(VarKey::select(i, replica));
    }
    for q in 0..instance.n_templates() {
        let f = instance.frequency(q) as f64;
        let t = VarKey::route(q, replica);
        builder = builder.term(t.clone(), f * instance.baseline(q) as f64 / m);
        for i in 0..instance.n_candidates() {
            let benefit = instance.benefit(i, q);
            if benefit != 0 {
                builder = builder.interaction(
                    VarKey::select(i, replica),
                    t.clone(),
                    -f * benefit as f64 / m,
                );
            }
        }
    }

    Ok(builder
        .encoding(objective, -1.0)
        .encoding(&slack, 1.0)
        .build())
}

/// `Σ_r t_{q,r} - m` for one template
pub fn routing_residual(
    instance: &ProblemInstance,
    template: usize,
    routing_target: i64,
) -> QuadraticModel {
    equality(
        (0..instance.n_replicas()).map(|r| (VarKey::route(template, r), 1.0)),
        routing_target as f64,
    )
}

/// `W - Σ_i w_i x_{i,r} - s^{wmax}_r` for one replica
pub fn storage_residual(instance: &ProblemInstance, replica: usize) -> CompileResult<QuadraticModel> {
    let terms = (0..instance.n_candidates())
        .map(|i| (VarKey::select(i, replica), instance.cost(i) as f64));
    let (residual, _) = inequality_le(
        terms,
        instance.storage_budget(),
        SlackSpace::StorageBudget { replica },
    )?;
    Ok(residual)
}

/// Unit-weight interaction on every pair of routing bits of one template
/// across distinct replicas; scaled by `C` during calibration
pub fn mutual_exclusion(instance: &ProblemInstance) -> QuadraticModel {
    let mut model = QuadraticModel::binary();
    for q in 0..instance.n_templates() {
        for r_i in 0..instance.n_replicas() {
            for r_j in (r_i + 1)..instance.n_replicas() {
                model.add_quadratic(VarKey::route(q, r_i), VarKey::route(q, r_j), 1.0);
            }
        }
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Assignment;
    use crate::workload::Candidate;

    fn instance() -> ProblemInstance {
        ProblemInstance::new(
            vec![Candidate::new("a", "t"), Candidate::new("b", "t")],
            2,
            2,
            vec![vec![10, 0], vec![0, 5]],
            vec![1, 1],
            vec![10, 5],
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_equality_residual() {
        let r = equality([(VarKey::route(0, 0), 1.0), (VarKey::route(0, 1), 1.0)], 1.0);
        assert_eq!(r.offset(), -1.0);
        let mut a = Assignment::new();
        a.insert(VarKey::route(0, 1), 1);
        assert_eq!(r.energy(&a), 0.0);
    }

    #[test]
    fn test_inequality_slack_absorbs_gap() {
        let (r, slack) = inequality_le(
            [(VarKey::select(0, 0), 3.0)],
            8,
            SlackSpace::StorageBudget { replica: 0 },
        )
        .unwrap();
        assert_eq!(slack.len(), 3);

        // 8 - 3 - 5 = 0
        let mut a = Assignment::new();
        a.insert(VarKey::select(0, 0), 1);
        a.insert(slack.bits()[0].0.clone(), 1);
        a.insert(slack.bits()[2].0.clone(), 1);
        assert_eq!(r.energy(&a), 0.0);
    }

    #[test]
    fn test_replica_residual_registers_all_bits() {
        let inst = instance();
        let (_, z) = objective(16).unwrap();
        let r = replica_cost_residual(&inst, 1, &z, 1).unwrap();
        assert!(r.contains(&VarKey::select(0, 1)));
        assert!(r.contains(&VarKey::select(1, 1)));
        assert!(r.contains(&VarKey::route(1, 1)));
        // zero benefit pairs carry no interaction
        assert_eq!(r.get_quadratic(&VarKey::select(0, 1), &VarKey::route(1, 1)), None);
        assert_eq!(
            r.get_quadratic(&VarKey::select(0, 1), &VarKey::route(0, 1)),
            Some(-10.0)
        );
    }

    #[test]
    fn test_replica_residual_zero_when_objective_matches_cost() {
        let inst = instance();
        let (_, z) = objective(16).unwrap();
        let r = replica_cost_residual(&inst, 0, &z, 1).unwrap();

        // both templates routed here, candidate 0 built: cost = 10 + 5 - 10 = 5
        let mut a = Assignment::new();
        a.insert(VarKey::route(0, 0), 1);
        a.insert(VarKey::route(1, 0), 1);
        a.insert(VarKey::select(0, 0), 1);
        a.insert(VarKey::slack(SlackSpace::Objective, 0), 1);
        a.insert(VarKey::slack(SlackSpace::Objective, 2), 1);
        assert_eq!(r.energy(&a), 0.0);
    }

    #[test]
    fn test_storage_budget_of_one_has_no_slack() {
        let inst = instance();
        let r = storage_residual(&inst, 0).unwrap();
        assert_eq!(r.num_variables(), 2);
        assert_eq!(r.offset(), 1.0);
    }

    #[test]
    fn test_mutual_exclusion_pairs() {
        let inst = instance();
        let model = mutual_exclusion(&inst);
        assert_eq!(model.num_interactions(), 2);
        assert_eq!(
            model.get_quadratic(&VarKey::route(1, 0), &VarKey::route(1, 1)),
            Some(1.0)
        );
    }
}
