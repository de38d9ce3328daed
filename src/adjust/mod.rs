//! Allocation repair and refinement moves.
//!
//! Each move is a pure function from the current allocation to a fresh one:
//!
//! - **Constraint-fix**: shrink the two largest shares by 5% and hand the
//!   freed share to the best-ranked entities that still have headroom.
//! - **Fine-tune**: move 2 points from the worst-ranked entity to the
//!   best-ranked one when the latter is unused. A no-op for `Balanced`.
//! - **Rebalance**: move 1 point from the largest share to the smallest.
//!
//! [`AdjustmentStrategy::select`] picks the move from the iteration outcome.
//! No move ever introduces an id that is not in the entity table, and every
//! touched share is clamped into `[0, 100]`.

mod config;
mod moves;
mod recommend;
mod strategy;

pub use config::{
    AdjustConfig, COST_ALERT_THRESHOLD, DONOR_COUNT, FINE_TUNE_SCORE_THRESHOLD, FINE_TUNE_STEP,
    MAX_RECOMMENDATIONS, REBALANCE_STEP, RECEIVER_COUNT, RISK_ALERT_THRESHOLD, SHRINK_FRACTION,
};
pub use moves::{constraint_fix, fine_tune, rebalance};
pub use recommend::{recommend, Recommendation};
pub use strategy::{AdjustContext, AdjustmentStrategy};
