//! Adjustment recommendations attached to each iteration.

use std::fmt;

use super::config::AdjustConfig;
use crate::constraints::Violation;
use crate::model::OptimizationTarget;

/// A suggested change for the next round, for downstream reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "id", rename_all = "snake_case"))]
pub enum Recommendation {
    ReduceEntity(String),
    ReduceGroup(String),
    IncreaseActiveEntities,
    ShiftToLowerCost,
    DiversifyToLowerRisk,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::ReduceEntity(id) => write!(f, "Reduce allocation to {id}"),
            Recommendation::ReduceGroup(tag) => write!(f, "Reduce allocation across group {tag}"),
            Recommendation::IncreaseActiveEntities => {
                f.write_str("Increase number of active suppliers")
            }
            Recommendation::ShiftToLowerCost => f.write_str("Shift to lower-cost suppliers"),
            Recommendation::DiversifyToLowerRisk => {
                f.write_str("Diversify to lower-risk suppliers")
            }
        }
    }
}

/// Builds at most `config.max_recommendations` recommendations: one per
/// violation first, then an objective hint when cost or risk exceeds its
/// alert threshold for the active target.
pub fn recommend(
    violations: &[Violation],
    cost: f64,
    risk: f64,
    target: OptimizationTarget,
    config: &AdjustConfig,
) -> Vec<Recommendation> {
    let mut out: Vec<Recommendation> = violations
        .iter()
        .map(|v| match v {
            Violation::EntityOverLimit { entity, .. } => {
                Recommendation::ReduceEntity(entity.clone())
            }
            Violation::GroupOverLimit { group, .. } => Recommendation::ReduceGroup(group.clone()),
            Violation::TooFewActive { .. } => Recommendation::IncreaseActiveEntities,
        })
        .collect();

    match target {
        OptimizationTarget::MinCost if cost > config.cost_alert_threshold => {
            out.push(Recommendation::ShiftToLowerCost)
        }
        OptimizationTarget::MinRisk if risk > config.risk_alert_threshold => {
            out.push(Recommendation::DiversifyToLowerRisk)
        }
        _ => {}
    }

    out.truncate(config.max_recommendations);
    out
}
