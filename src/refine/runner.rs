//! Refinement loop execution.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::config::RefineConfig;
use super::types::{Anomaly, Iteration, LoopState};
use crate::adjust::{recommend, AdjustContext, AdjustmentStrategy};
use crate::constraints::{evaluate, Constraint};
use crate::error::OptimizeError;
use crate::model::{Allocation, EntityTable, OptimizationTarget};
use crate::objective::ObjectiveScorer;

/// Read-only inputs of one refinement run.
#[derive(Debug, Clone, Copy)]
pub struct RefineProblem<'a> {
    pub table: &'a EntityTable,
    /// Constraints already validated against `table`.
    pub constraints: &'a [Constraint],
    pub target: OptimizationTarget,
}

/// Result of a refinement run.
#[derive(Debug, Clone)]
pub struct RefineOutcome {
    /// Every evaluated iteration, in order. Never empty.
    pub trace: Vec<Iteration>,

    /// Terminal state.
    pub state: LoopState,

    /// Best combined score seen.
    pub best_score: f64,
}

impl RefineOutcome {
    pub fn converged(&self) -> bool {
        self.state == LoopState::Converged
    }
}

/// Executes the refinement loop.
///
/// # Usage
///
/// ```
/// use u_allocate::constraints::Constraint;
/// use u_allocate::model::{Allocation, Entity, EntityTable, OptimizationTarget};
/// use u_allocate::refine::{RefineConfig, RefineProblem, RefineRunner};
///
/// let table = EntityTable::new(vec![
///     Entity::new("A", 1000.0, 30.0),
///     Entity::new("B", 950.0, 45.0),
/// ]).unwrap();
/// let constraints = vec![Constraint::max_entity("A", 30.0)];
/// let problem = RefineProblem {
///     table: &table,
///     constraints: &constraints,
///     target: OptimizationTarget::Balanced,
/// };
///
/// let runner = RefineRunner::new(RefineConfig::default()).unwrap();
/// let outcome = runner.run(&Allocation::from([("A", 80.0), ("B", 20.0)]), &problem);
/// assert!(!outcome.trace[0].feasible);
/// ```
#[derive(Debug, Clone)]
pub struct RefineRunner {
    config: RefineConfig,
    scorer: ObjectiveScorer,
}

impl RefineRunner {
    /// Creates a runner after validating `config`.
    pub fn new(config: RefineConfig) -> Result<Self, OptimizeError> {
        config.validate()?;
        let scorer = ObjectiveScorer::new(config.scoring.clone());
        Ok(Self { config, scorer })
    }

    pub fn config(&self) -> &RefineConfig {
        &self.config
    }

    /// Runs the loop from `seed` to a terminal state.
    pub fn run(&self, seed: &Allocation, problem: &RefineProblem<'_>) -> RefineOutcome {
        self.run_with_cancel(seed, problem, None)
    }

    /// Runs the loop with an optional cancellation token.
    ///
    /// The flag is checked after each recorded iteration, so the trace always
    /// holds at least one iteration even when the flag is already set.
    #[tracing::instrument(
        level = "debug",
        name = "refine",
        skip_all,
        fields(
            target = %problem.target,
            entities = problem.table.len(),
            constraints = problem.constraints.len(),
        )
    )]
    pub fn run_with_cancel(
        &self,
        seed: &Allocation,
        problem: &RefineProblem<'_>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> RefineOutcome {
        let config = &self.config;
        let ctx = AdjustContext {
            table: problem.table,
            constraints: problem.constraints,
            target: problem.target,
            config: &config.adjust,
        };

        let mut trace: Vec<Iteration> = Vec::with_capacity(config.max_iterations);
        let mut current = seed.clone();
        let mut best_score = f64::NEG_INFINITY;
        let mut no_improve_count = 0usize;
        let mut state = LoopState::Running;

        for index in 1..=config.max_iterations {
            let mut iteration = self.evaluate(index, current, problem);

            tracing::debug!(
                iteration = index,
                score = iteration.score,
                cost = iteration.cost,
                risk = iteration.risk,
                violations = iteration.violations.len(),
                feasible = iteration.feasible,
                "iteration evaluated"
            );

            if iteration.score > best_score + config.convergence_threshold {
                best_score = iteration.score;
                no_improve_count = 0;
            } else {
                no_improve_count += 1;
            }

            let cancelled = cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed));

            if no_improve_count >= config.patience {
                state = LoopState::Converged;
            } else if index == config.max_iterations {
                state = LoopState::MaxIterationsReached;
            } else if cancelled {
                state = LoopState::Cancelled;
            }

            if state.is_terminal() {
                trace.push(iteration);
                break;
            }

            let strategy = AdjustmentStrategy::select(
                iteration.feasible,
                iteration.score,
                problem.target,
                config.adjust.fine_tune_threshold,
            );
            current = strategy.apply(&iteration.allocation, &ctx);
            iteration.next_strategy = Some(strategy);
            trace.push(iteration);
        }

        tracing::info!(
            iterations = trace.len(),
            state = ?state,
            best_score,
            feasible = trace.iter().filter(|it| it.feasible).count(),
            "refinement finished"
        );

        RefineOutcome {
            trace,
            state,
            best_score,
        }
    }

    /// Evaluates constraints and objective for one allocation.
    fn evaluate(
        &self,
        index: usize,
        allocation: Allocation,
        problem: &RefineProblem<'_>,
    ) -> Iteration {
        let evaluation = evaluate(&allocation, problem.constraints);
        let objective = self.scorer.score(&allocation, problem.table);
        let score = self
            .scorer
            .combine(problem.target, &objective, evaluation.satisfaction);

        let recommendations = recommend(
            &evaluation.violations,
            objective.cost,
            objective.risk,
            problem.target,
            &self.config.adjust,
        );

        let mut anomalies: Vec<Anomaly> = objective
            .unknown_entities
            .into_iter()
            .map(|entity| Anomaly::UnknownEntity { entity })
            .collect();
        if objective.degenerate {
            anomalies.push(Anomaly::DegenerateAllocation);
        }

        let feasible = evaluation.feasible();
        Iteration {
            index,
            allocation,
            violations: evaluation.violations,
            cost: objective.cost,
            risk: objective.risk,
            satisfaction: evaluation.satisfaction,
            recommendations,
            feasible,
            score,
            next_strategy: None,
            anomalies,
        }
    }
}
