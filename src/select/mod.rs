//! Picking the optimal and alternative solutions from a trace.
//!
//! Only feasible iterations are candidates. Selections are returned as trace
//! positions, so two iterations holding identical allocations remain
//! distinct entries.

mod selector;
mod summary;

pub use selector::{select, Selection, SolutionSelector, MAX_ALTERNATIVES};
pub use summary::{
    score_plateau, summarize, RangeStats, RunVerdict, SolutionSummary, PLATEAU_TOLERANCE,
    PLATEAU_WINDOW,
};
