//! Iteration records and loop states.

use crate::adjust::{AdjustmentStrategy, Recommendation};
use crate::constraints::Violation;
use crate::model::Allocation;

/// Terminal (or current) state of the refinement loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LoopState {
    Running,
    /// The score stopped improving.
    Converged,
    /// The iteration cap was hit.
    MaxIterationsReached,
    /// The caller's cancel flag was observed at an iteration boundary.
    Cancelled,
}

impl LoopState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoopState::Running)
    }
}

/// A recoverable problem noticed while scoring one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Anomaly {
    /// The allocation holds an id missing from the entity table; it counted
    /// as zero cost and zero risk weight.
    UnknownEntity { entity: String },
    /// No positive share on any known entity; cost and risk fell back to 0.
    DegenerateAllocation,
}

/// One evaluated allocation in the trace.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Iteration {
    /// 1-based position in the trace.
    pub index: usize,
    /// Snapshot of the allocation evaluated in this iteration.
    pub allocation: Allocation,
    pub violations: Vec<Violation>,
    pub cost: f64,
    pub risk: f64,
    /// Percentage of constraints satisfied.
    pub satisfaction: f64,
    pub recommendations: Vec<Recommendation>,
    /// Always `violations.is_empty()`.
    pub feasible: bool,
    /// Combined objective score.
    pub score: f64,
    /// Move applied to produce the next iteration; `None` on the last one.
    pub next_strategy: Option<AdjustmentStrategy>,
    pub anomalies: Vec<Anomaly>,
}
