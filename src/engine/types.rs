//! Request, response and diagnostic records.

use std::fmt;

use crate::constraints::{Constraint, SkipReason};
use crate::error::OptimizeError;
use crate::model::{Allocation, Entity, OptimizationTarget};
use crate::refine::{Iteration, LoopState};
use crate::select::{RunVerdict, SolutionSummary};

/// Everything a single optimization run needs.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationRequest {
    /// Starting allocation, entity id to percentage.
    pub initial_allocation: Allocation,

    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Vec<Constraint>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub target: OptimizationTarget,

    /// Candidate entities with their cost and risk attributes.
    pub entities: Vec<Entity>,
}

impl OptimizationRequest {
    pub fn new(entities: Vec<Entity>, initial_allocation: Allocation) -> Self {
        Self {
            initial_allocation,
            constraints: Vec::new(),
            target: OptimizationTarget::default(),
            entities,
        }
    }

    /// Sets the constraints, evaluated in request order.
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the optimization target.
    pub fn with_target(mut self, target: OptimizationTarget) -> Self {
        self.target = target;
        self
    }
}

/// A non-fatal note about how a request was interpreted, or the structural
/// error that stopped it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Diagnostic {
    /// A constraint referenced nothing in the entity table and was not
    /// evaluated.
    ConstraintSkipped {
        index: usize,
        constraint: Constraint,
        reason: SkipReason,
    },

    /// A minimum-active constraint asks for more entities than exist. It is
    /// still evaluated and can never be met.
    UnreachableMinimum {
        index: usize,
        required: usize,
        available: usize,
    },

    /// A seed percentage outside `[0, 100]` was clamped into range.
    SeedValueClamped {
        entity: String,
        value: f64,
        clamped: f64,
    },

    /// The seed allocation holds an id missing from the entity table.
    UnknownSeedEntity { entity: String },

    /// The run never started.
    Aborted { error: OptimizeError },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ConstraintSkipped {
                index,
                constraint,
                reason,
            } => {
                let why = match reason {
                    SkipReason::UnknownEntity => "unknown entity",
                    SkipReason::EmptyGroup => "no entity in group",
                };
                write!(f, "constraint #{index} ({constraint}) skipped: {why}")
            }
            Diagnostic::UnreachableMinimum {
                index,
                required,
                available,
            } => write!(
                f,
                "constraint #{index} requires {required} active entities but only {available} exist"
            ),
            Diagnostic::SeedValueClamped {
                entity,
                value,
                clamped,
            } => write!(
                f,
                "initial allocation for {entity} was {value}, clamped to {clamped}"
            ),
            Diagnostic::UnknownSeedEntity { entity } => {
                write!(f, "initial allocation names unknown entity {entity}")
            }
            Diagnostic::Aborted { error } => write!(f, "optimization aborted: {error}"),
        }
    }
}

/// Outcome of an optimization request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationResponse {
    /// Equals `trace.len()`. Zero only when the run was aborted.
    pub total_iterations: usize,
    pub feasible_count: usize,
    pub converged: bool,
    /// `None` when the run was aborted.
    pub stop_reason: Option<LoopState>,
    pub trace: Vec<Iteration>,
    pub optimal: Option<Iteration>,
    /// Best combined score first. Never contains the optimum.
    pub alternatives: Vec<Iteration>,
    pub summary: SolutionSummary,
    pub verdict: RunVerdict,
    pub diagnostics: Vec<Diagnostic>,
}

impl OptimizationResponse {
    /// Response for a request rejected before the loop started.
    pub fn aborted(error: OptimizeError) -> Self {
        Self {
            total_iterations: 0,
            feasible_count: 0,
            converged: false,
            stop_reason: None,
            trace: Vec::new(),
            optimal: None,
            alternatives: Vec::new(),
            summary: crate::select::summarize(&[]),
            verdict: RunVerdict::NoFeasibleSolution,
            diagnostics: vec![Diagnostic::Aborted { error }],
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::Aborted { .. }))
    }
}
