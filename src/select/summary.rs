//! Summary statistics over the feasible part of a trace.

use super::selector::Selection;
use crate::refine::Iteration;

/// Number of trailing iterations inspected by [`score_plateau`].
pub const PLATEAU_WINDOW: usize = 5;

/// Maximum score spread within the window for a plateau.
pub const PLATEAU_TOLERANCE: f64 = 1.0;

/// Min/max/mean of one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// `max - min`.
    pub range: f64,
}

impl RangeStats {
    /// Stats over `values`, or `None` when there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        (count > 0).then(|| RangeStats {
            min,
            max,
            avg: sum / count as f64,
            range: max - min,
        })
    }
}

/// Aggregate view of a run's feasible iterations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolutionSummary {
    pub feasible_count: usize,
    pub cost: Option<RangeStats>,
    pub risk: Option<RangeStats>,
    pub satisfaction: Option<RangeStats>,
    /// Every feasible iteration satisfied 100% of constraints. `false` when
    /// there are no feasible iterations.
    pub all_fully_satisfied: bool,
    /// See [`score_plateau`].
    pub score_plateau: bool,
}

/// Summarizes the feasible iterations of `trace`.
pub fn summarize(trace: &[Iteration]) -> SolutionSummary {
    let feasible: Vec<&Iteration> = trace.iter().filter(|it| it.feasible).collect();

    SolutionSummary {
        feasible_count: feasible.len(),
        cost: RangeStats::from_values(feasible.iter().map(|it| it.cost)),
        risk: RangeStats::from_values(feasible.iter().map(|it| it.risk)),
        satisfaction: RangeStats::from_values(feasible.iter().map(|it| it.satisfaction)),
        all_fully_satisfied: !feasible.is_empty()
            && feasible.iter().all(|it| it.satisfaction >= 100.0),
        score_plateau: score_plateau(trace),
    }
}

/// Whether the last [`PLATEAU_WINDOW`] scores lie within
/// [`PLATEAU_TOLERANCE`] of each other. Shorter traces never plateau.
pub fn score_plateau(trace: &[Iteration]) -> bool {
    if trace.len() < PLATEAU_WINDOW {
        return false;
    }
    RangeStats::from_values(trace[trace.len() - PLATEAU_WINDOW..].iter().map(|it| it.score))
        .is_some_and(|s| s.range < PLATEAU_TOLERANCE)
}

/// Headline outcome of a run, for downstream report wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RunVerdict {
    /// No compliant allocation was found.
    NoFeasibleSolution,
    /// An optimum with fewer than two alternatives.
    OptimalOnly,
    /// An optimum with at least two alternatives to choose from.
    OptimalWithAlternatives,
}

impl RunVerdict {
    pub fn from_selection(selection: &Selection) -> Self {
        match (selection.optimal, selection.alternatives.len()) {
            (None, _) => RunVerdict::NoFeasibleSolution,
            (Some(_), n) if n >= 2 => RunVerdict::OptimalWithAlternatives,
            (Some(_), _) => RunVerdict::OptimalOnly,
        }
    }
}
