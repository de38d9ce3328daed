//! Optimal and alternative selection.

use crate::model::OptimizationTarget;
use crate::refine::Iteration;

/// Default number of alternatives kept next to the optimum.
pub const MAX_ALTERNATIVES: usize = 3;

/// Positions in the trace of the chosen solutions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub optimal: Option<usize>,
    /// Best combined score first. Never contains `optimal`.
    pub alternatives: Vec<usize>,
}

impl Selection {
    pub fn optimal<'a>(&self, trace: &'a [Iteration]) -> Option<&'a Iteration> {
        self.optimal.and_then(|i| trace.get(i))
    }

    pub fn alternatives<'a>(&self, trace: &'a [Iteration]) -> Vec<&'a Iteration> {
        self.alternatives
            .iter()
            .filter_map(|&i| trace.get(i))
            .collect()
    }
}

/// Chooses an optimum per target plus the best-scoring alternatives.
#[derive(Debug, Clone, Copy)]
pub struct SolutionSelector {
    max_alternatives: usize,
}

impl Default for SolutionSelector {
    fn default() -> Self {
        Self {
            max_alternatives: MAX_ALTERNATIVES,
        }
    }
}

impl SolutionSelector {
    /// Creates a selector keeping up to `max_alternatives`, capped at
    /// [`MAX_ALTERNATIVES`].
    pub fn new(max_alternatives: usize) -> Self {
        Self {
            max_alternatives: max_alternatives.min(MAX_ALTERNATIVES),
        }
    }

    /// Selects from the feasible iterations of `trace`.
    ///
    /// - `MinCost`: lowest cost. `MinRisk`: lowest risk. `Balanced`: highest
    ///   combined score. Ties go to the earliest iteration.
    /// - Alternatives: the remaining feasible iterations by combined score,
    ///   descending, earliest first on ties.
    pub fn select(&self, trace: &[Iteration], target: OptimizationTarget) -> Selection {
        let feasible: Vec<usize> = trace
            .iter()
            .enumerate()
            .filter(|(_, it)| it.feasible)
            .map(|(i, _)| i)
            .collect();

        let Some(optimal) = pick_optimal(trace, &feasible, target) else {
            return Selection::default();
        };

        let mut alternatives: Vec<usize> =
            feasible.into_iter().filter(|&i| i != optimal).collect();
        alternatives.sort_by(|&a, &b| trace[b].score.total_cmp(&trace[a].score));
        alternatives.truncate(self.max_alternatives);

        Selection {
            optimal: Some(optimal),
            alternatives,
        }
    }
}

/// [`SolutionSelector::select`] with the default alternative count.
///
/// # Examples
///
/// ```
/// use u_allocate::model::OptimizationTarget;
/// use u_allocate::refine::Iteration;
/// use u_allocate::select::select;
///
/// let trace: Vec<Iteration> = vec![];
/// let selection = select(&trace, OptimizationTarget::Balanced);
/// assert!(selection.optimal.is_none());
/// assert!(selection.alternatives.is_empty());
/// ```
pub fn select(trace: &[Iteration], target: OptimizationTarget) -> Selection {
    SolutionSelector::default().select(trace, target)
}

fn pick_optimal(
    trace: &[Iteration],
    candidates: &[usize],
    target: OptimizationTarget,
) -> Option<usize> {
    let better = |a: &Iteration, b: &Iteration| match target {
        OptimizationTarget::MinCost => a.cost < b.cost,
        OptimizationTarget::MinRisk => a.risk < b.risk,
        OptimizationTarget::Balanced => a.score > b.score,
    };

    candidates.iter().copied().reduce(|best, i| {
        if better(&trace[i], &trace[best]) {
            i
        } else {
            best
        }
    })
}
