//! Cost/risk objective scoring.
//!
//! [`ObjectiveScorer`] turns an allocation into raw cost and risk plus their
//! normalized `[0, 100]` scores (higher is better). Combining those with
//! constraint satisfaction into the single comparable score happens once per
//! iteration through [`ScoringConfig::combine`].

mod config;
mod scorer;

pub use config::{
    ScoringConfig, BALANCED_COST_WEIGHT, BALANCED_RISK_WEIGHT, COST_NORMALIZATION_DIVISOR,
    PRIMARY_OBJECTIVE_WEIGHT, SATISFACTION_WEIGHT,
};
pub use scorer::{ObjectiveScore, ObjectiveScorer};
