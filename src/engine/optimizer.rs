//! The request/response façade.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::config::OptimizerConfig;
use super::types::{Diagnostic, OptimizationRequest, OptimizationResponse};
use crate::constraints::{validate_constraints, Constraint};
use crate::error::OptimizeError;
use crate::model::{clamp_percent, Allocation, EntityTable};
use crate::refine::{RefineProblem, RefineRunner};
use crate::select::{summarize, RunVerdict, SolutionSelector};

/// Validates a request, runs the refinement loop and selects solutions.
///
/// # Usage
///
/// ```
/// use u_allocate::constraints::Constraint;
/// use u_allocate::engine::{AllocationOptimizer, OptimizationRequest, OptimizerConfig};
/// use u_allocate::model::{Allocation, Entity, OptimizationTarget};
///
/// let request = OptimizationRequest::new(
///     vec![Entity::new("A", 1000.0, 30.0), Entity::new("B", 950.0, 45.0)],
///     Allocation::from([("A", 80.0), ("B", 20.0)]),
/// )
/// .with_constraints(vec![Constraint::max_entity("A", 30.0)])
/// .with_target(OptimizationTarget::Balanced);
///
/// let optimizer = AllocationOptimizer::new(OptimizerConfig::default()).unwrap();
/// let response = optimizer.optimize(&request);
/// assert!(response.total_iterations >= 1);
/// assert!(!response.trace[0].feasible);
/// ```
#[derive(Debug, Clone)]
pub struct AllocationOptimizer {
    config: OptimizerConfig,
    runner: RefineRunner,
    selector: SolutionSelector,
}

impl AllocationOptimizer {
    /// Creates an optimizer after validating `config`.
    pub fn new(config: OptimizerConfig) -> Result<Self, OptimizeError> {
        config.validate()?;
        let runner = RefineRunner::new(config.refine.clone())?;
        let selector = SolutionSelector::new(config.max_alternatives);
        Ok(Self {
            config,
            runner,
            selector,
        })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Runs `request` to completion. Structural errors are reported as an
    /// aborted response instead of an `Err`.
    pub fn optimize(&self, request: &OptimizationRequest) -> OptimizationResponse {
        self.optimize_with_cancel(request, None)
    }

    /// [`optimize`](Self::optimize) with an optional cancellation token.
    pub fn optimize_with_cancel(
        &self,
        request: &OptimizationRequest,
        cancel: Option<Arc<AtomicBool>>,
    ) -> OptimizationResponse {
        match self.try_optimize_with_cancel(request, cancel) {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, "optimization aborted");
                OptimizationResponse::aborted(error)
            }
        }
    }

    /// Runs `request`, returning structural errors directly.
    ///
    /// # Errors
    ///
    /// Fails on an empty or invalid entity table, a malformed constraint, or
    /// a non-finite seed value.
    pub fn try_optimize(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationResponse, OptimizeError> {
        self.try_optimize_with_cancel(request, None)
    }

    #[tracing::instrument(
        level = "info",
        name = "optimize",
        skip_all,
        fields(
            target = %request.target,
            entities = request.entities.len(),
            constraints = request.constraints.len(),
        )
    )]
    fn try_optimize_with_cancel(
        &self,
        request: &OptimizationRequest,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<OptimizationResponse, OptimizeError> {
        let table = EntityTable::new(request.entities.clone())?;
        let validated = validate_constraints(&request.constraints, &table)?;
        let mut diagnostics = Vec::new();

        for skipped in validated.skipped {
            let diagnostic = Diagnostic::ConstraintSkipped {
                index: skipped.index,
                constraint: skipped.constraint,
                reason: skipped.reason,
            };
            tracing::warn!(%diagnostic, "constraint skipped");
            diagnostics.push(diagnostic);
        }
        for index in validated.unreachable_minimums {
            if let Some(Constraint::MinActiveEntities { limit }) =
                request.constraints.get(index)
            {
                let diagnostic = Diagnostic::UnreachableMinimum {
                    index,
                    required: *limit,
                    available: table.len(),
                };
                tracing::warn!(%diagnostic, "unreachable minimum");
                diagnostics.push(diagnostic);
            }
        }

        let seed = sanitize_seed(&request.initial_allocation, &table, &mut diagnostics)?;

        tracing::info!(
            active_constraints = validated.active.len(),
            seed_entries = seed.len(),
            "optimization started"
        );

        let problem = RefineProblem {
            table: &table,
            constraints: &validated.active,
            target: request.target,
        };
        let mut outcome = self.runner.run_with_cancel(&seed, &problem, cancel);

        // Violations index the active list; report request positions instead.
        for violation in outcome
            .trace
            .iter_mut()
            .flat_map(|it| it.violations.iter_mut())
        {
            if let Some(&index) = validated.active_indices.get(violation.constraint_index()) {
                violation.set_constraint_index(index);
            }
        }

        let selection = self.selector.select(&outcome.trace, request.target);
        let summary = summarize(&outcome.trace);
        let verdict = RunVerdict::from_selection(&selection);
        let optimal = selection.optimal(&outcome.trace).cloned();
        let alternatives = selection
            .alternatives(&outcome.trace)
            .into_iter()
            .cloned()
            .collect();

        Ok(OptimizationResponse {
            total_iterations: outcome.trace.len(),
            feasible_count: summary.feasible_count,
            converged: outcome.converged(),
            stop_reason: Some(outcome.state),
            trace: outcome.trace,
            optimal,
            alternatives,
            summary,
            verdict,
            diagnostics,
        })
    }

    /// Runs independent requests on the rayon pool. Output order matches
    /// input order.
    #[cfg(feature = "parallel")]
    pub fn optimize_batch(&self, requests: &[OptimizationRequest]) -> Vec<OptimizationResponse> {
        use rayon::prelude::*;

        requests.par_iter().map(|r| self.optimize(r)).collect()
    }
}

/// Copies the seed, clamping every value into `[0, 100]`.
fn sanitize_seed(
    seed: &Allocation,
    table: &EntityTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Allocation, OptimizeError> {
    let mut out = Allocation::new();
    for (id, value) in seed.iter() {
        if !value.is_finite() {
            return Err(OptimizeError::InvalidAllocationValue {
                entity: id.to_string(),
            });
        }
        if !table.contains(id) {
            let diagnostic = Diagnostic::UnknownSeedEntity {
                entity: id.to_string(),
            };
            tracing::warn!(%diagnostic, "unknown seed entity");
            diagnostics.push(diagnostic);
        }
        let clamped = clamp_percent(value);
        if clamped != value {
            let diagnostic = Diagnostic::SeedValueClamped {
                entity: id.to_string(),
                value,
                clamped,
            };
            tracing::warn!(%diagnostic, "seed value clamped");
            diagnostics.push(diagnostic);
        }
        out.insert(id, clamped);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::SkipReason;
    use crate::model::{Entity, OptimizationTarget};
    use crate::refine::LoopState;

    fn ab_entities() -> Vec<Entity> {
        vec![
            Entity::new("A", 1000.0, 30.0),
            Entity::new("B", 950.0, 45.0),
        ]
    }

    fn optimizer() -> AllocationOptimizer {
        AllocationOptimizer::new(OptimizerConfig::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = OptimizerConfig::default()
            .with_refine(crate::refine::RefineConfig::default().with_max_iterations(0));
        assert!(AllocationOptimizer::new(config).is_err());

        let config = OptimizerConfig::default().with_max_alternatives(10);
        assert!(matches!(
            AllocationOptimizer::new(config),
            Err(OptimizeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_entity_table_aborts() {
        let request = OptimizationRequest::new(vec![], Allocation::from([("A", 100.0)]))
            .with_constraints(vec![Constraint::max_entity("A", 30.0)]);

        let response = optimizer().optimize(&request);
        assert_eq!(response.total_iterations, 0);
        assert!(response.trace.is_empty());
        assert!(response.optimal.is_none());
        assert!(response.alternatives.is_empty());
        assert!(response.stop_reason.is_none());
        assert_eq!(
            response.diagnostics,
            vec![Diagnostic::Aborted {
                error: OptimizeError::EmptyEntityTable
            }]
        );

        assert_eq!(
            optimizer().try_optimize(&request).unwrap_err(),
            OptimizeError::EmptyEntityTable
        );
    }

    #[test]
    fn test_single_violation_scenario() {
        let request = OptimizationRequest::new(
            ab_entities(),
            Allocation::from([("A", 80.0), ("B", 20.0)]),
        )
        .with_constraints(vec![Constraint::max_entity("A", 30.0)])
        .with_target(OptimizationTarget::Balanced);

        let response = optimizer().optimize(&request);
        assert!(response.diagnostics.is_empty());
        assert!(response.total_iterations >= 2);
        assert_eq!(response.total_iterations, response.trace.len());

        let first = &response.trace[0];
        assert!(!first.feasible);
        assert_eq!(first.satisfaction, 0.0);
        assert!(response.trace[1].allocation.get("A") < 80.0);

        assert_eq!(response.feasible_count, response.summary.feasible_count);
        assert_eq!(
            response.optimal.is_none(),
            response.verdict == RunVerdict::NoFeasibleSolution
        );
    }

    #[test]
    fn test_zero_constraints_converges() {
        let request = OptimizationRequest::new(
            ab_entities(),
            Allocation::from([("A", 80.0), ("B", 20.0)]),
        );

        let response = optimizer().optimize(&request);
        assert!(response.converged);
        assert_eq!(response.stop_reason, Some(LoopState::Converged));
        assert_eq!(response.total_iterations, 6);
        assert_eq!(response.feasible_count, 6);
        assert!(response.summary.all_fully_satisfied);

        let optimal = response.optimal.as_ref().unwrap();
        assert_eq!(optimal.index, 1);
        assert_eq!(response.alternatives.len(), 3);
        assert!(response.alternatives.iter().all(|a| a.index != optimal.index));
        assert_eq!(response.verdict, RunVerdict::OptimalWithAlternatives);
    }

    #[test]
    fn test_skipped_and_unreachable_constraints_reported() {
        let request = OptimizationRequest::new(
            ab_entities(),
            Allocation::from([("A", 50.0), ("B", 50.0)]),
        )
        .with_constraints(vec![
            Constraint::max_entity("Z", 30.0),
            Constraint::max_group("Brazil", 40.0),
            Constraint::min_active(5),
        ]);

        let response = optimizer().optimize(&request);
        assert!(!response.is_aborted());
        assert_eq!(
            response.diagnostics,
            vec![
                Diagnostic::ConstraintSkipped {
                    index: 0,
                    constraint: Constraint::max_entity("Z", 30.0),
                    reason: SkipReason::UnknownEntity,
                },
                Diagnostic::ConstraintSkipped {
                    index: 1,
                    constraint: Constraint::max_group("Brazil", 40.0),
                    reason: SkipReason::EmptyGroup,
                },
                Diagnostic::UnreachableMinimum {
                    index: 2,
                    required: 5,
                    available: 2,
                },
            ]
        );
        // Only the unreachable minimum is evaluated.
        assert_eq!(response.trace[0].violations.len(), 1);
        assert_eq!(response.trace[0].violations[0].constraint_index(), 2);
        assert_eq!(response.feasible_count, 0);
        assert_eq!(response.verdict, RunVerdict::NoFeasibleSolution);
    }

    #[test]
    fn test_seed_sanitizing() {
        let request = OptimizationRequest::new(
            ab_entities(),
            Allocation::from([("A", -5.0), ("B", 60.0), ("Ghost", 10.0)]),
        );
        let response = optimizer().optimize(&request);
        assert_eq!(response.trace[0].allocation.get("A"), 0.0);
        assert!(response.diagnostics.contains(&Diagnostic::SeedValueClamped {
            entity: "A".into(),
            value: -5.0,
            clamped: 0.0,
        }));
        assert!(response.diagnostics.contains(&Diagnostic::UnknownSeedEntity {
            entity: "Ghost".into(),
        }));

        let request = OptimizationRequest::new(ab_entities(), Allocation::from([("A", f64::NAN)]));
        let response = optimizer().optimize(&request);
        assert!(response.is_aborted());
        assert!(matches!(
            optimizer().try_optimize(&request),
            Err(OptimizeError::InvalidAllocationValue { .. })
        ));
    }

    #[test]
    fn test_seed_above_hundred_clamped() {
        let request = OptimizationRequest::new(
            vec![
                Entity::new("A", 1000.0, 30.0),
                Entity::new("B", 950.0, 45.0),
                Entity::new("C", 980.0, 50.0),
                Entity::new("D", 1020.0, 35.0),
            ],
            Allocation::from([("A", 500.0)]),
        )
        .with_constraints(vec![Constraint::max_entity("A", 30.0)]);

        let response = optimizer().optimize(&request);
        assert_eq!(
            response.diagnostics,
            vec![Diagnostic::SeedValueClamped {
                entity: "A".into(),
                value: 500.0,
                clamped: 100.0,
            }]
        );
        assert_eq!(response.trace[0].allocation.get("A"), 100.0);

        // A single donor frees 5 points out of 100, not out of 500.
        let second = &response.trace[1].allocation;
        assert!((second.get("A") - 95.0).abs() < 1e-9);
        assert!((second.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_constraint_aborts() {
        let request = OptimizationRequest::new(
            ab_entities(),
            Allocation::from([("A", 50.0)]),
        )
        .with_constraints(vec![Constraint::max_entity("A", -10.0)]);
        let response = optimizer().optimize(&request);
        assert!(response.is_aborted());
        assert_eq!(response.total_iterations, 0);
    }

    #[test]
    fn test_deterministic() {
        let request = OptimizationRequest::new(
            vec![
                Entity::new("Supplier_A", 1000.0, 30.0),
                Entity::new("Supplier_B", 950.0, 45.0),
                Entity::new("Region_India", 980.0, 50.0),
                Entity::new("Region_Thailand", 1020.0, 35.0),
            ],
            Allocation::from([("Supplier_A", 70.0), ("Region_India", 30.0)]),
        )
        .with_constraints(vec![
            Constraint::max_entity("Supplier_A", 40.0),
            Constraint::max_group("India", 40.0),
            Constraint::min_active(3),
        ])
        .with_target(OptimizationTarget::MinCost);

        let opt = optimizer();
        assert_eq!(opt.optimize(&request), opt.optimize(&request));
    }

    #[test]
    fn test_cancel_before_start_keeps_one_iteration() {
        let request = OptimizationRequest::new(
            ab_entities(),
            Allocation::from([("A", 50.0), ("B", 50.0)]),
        );
        let cancel = Arc::new(AtomicBool::new(true));
        let response = optimizer().optimize_with_cancel(&request, Some(cancel));
        assert_eq!(response.total_iterations, 1);
        assert_eq!(response.stop_reason, Some(LoopState::Cancelled));
        assert!(!response.converged);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_batch_matches_sequential() {
        let opt = optimizer();
        let requests = vec![
            OptimizationRequest::new(ab_entities(), Allocation::from([("A", 80.0)])),
            OptimizationRequest::new(vec![], Allocation::new()),
        ];
        let batch = opt.optimize_batch(&requests);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], opt.optimize(&requests[0]));
        assert!(batch[1].is_aborted());
    }
}
