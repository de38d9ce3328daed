//! Strategy selection.

use super::config::AdjustConfig;
use super::moves;
use crate::constraints::Constraint;
use crate::model::{Allocation, EntityTable, OptimizationTarget};

/// Read-only inputs every move needs.
#[derive(Debug, Clone, Copy)]
pub struct AdjustContext<'a> {
    pub table: &'a EntityTable,
    pub constraints: &'a [Constraint],
    pub target: OptimizationTarget,
    pub config: &'a AdjustConfig,
}

/// The move applied to produce the next allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "target", rename_all = "snake_case"))]
pub enum AdjustmentStrategy {
    /// Repair an infeasible allocation.
    ConstraintFix,
    /// Polish a feasible, high-scoring allocation toward `target`.
    FineTune(OptimizationTarget),
    /// Small shift from the largest share to the smallest.
    Rebalance,
}

impl AdjustmentStrategy {
    /// Chooses the move for an iteration outcome.
    ///
    /// Infeasible allocations are always repaired first; a feasible one is
    /// fine-tuned only when its score is strictly above `fine_tune_threshold`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_allocate::adjust::AdjustmentStrategy;
    /// use u_allocate::model::OptimizationTarget;
    ///
    /// let t = OptimizationTarget::MinCost;
    /// let pick = |feasible, score| AdjustmentStrategy::select(feasible, score, t, 80.0);
    /// assert_eq!(pick(false, 95.0), AdjustmentStrategy::ConstraintFix);
    /// assert_eq!(pick(true, 95.0), AdjustmentStrategy::FineTune(t));
    /// assert_eq!(pick(true, 80.0), AdjustmentStrategy::Rebalance);
    /// ```
    pub fn select(
        feasible: bool,
        score: f64,
        target: OptimizationTarget,
        fine_tune_threshold: f64,
    ) -> Self {
        match (feasible, score > fine_tune_threshold) {
            (false, _) => AdjustmentStrategy::ConstraintFix,
            (true, true) => AdjustmentStrategy::FineTune(target),
            (true, false) => AdjustmentStrategy::Rebalance,
        }
    }

    /// Applies the move, returning a new allocation.
    pub fn apply(&self, allocation: &Allocation, ctx: &AdjustContext<'_>) -> Allocation {
        match *self {
            AdjustmentStrategy::ConstraintFix => moves::constraint_fix(allocation, ctx),
            AdjustmentStrategy::FineTune(target) => {
                moves::fine_tune(allocation, ctx.table, target, ctx.config.fine_tune_step)
            }
            AdjustmentStrategy::Rebalance => {
                moves::rebalance(allocation, ctx.config.rebalance_step)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AdjustmentStrategy::ConstraintFix => "constraint_fix",
            AdjustmentStrategy::FineTune(_) => "fine_tune",
            AdjustmentStrategy::Rebalance => "rebalance",
        }
    }
}
