//! Cost and risk of an allocation.

use super::config::ScoringConfig;
use crate::model::{Allocation, EntityTable, OptimizationTarget};

/// Raw and normalized objective values for one allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveScore {
    /// `Σ share/100 * cost_per_unit` over known entities.
    pub cost: f64,
    /// Share-weighted mean risk over known entities; 0 when nothing is
    /// allocated to a known entity.
    pub risk: f64,
    /// `clamp(100 - cost / divisor, 0, 100)`.
    pub cost_score: f64,
    /// `clamp(100 - risk, 0, 100)`.
    pub risk_score: f64,
    /// Allocation keys with no entry in the entity table. They contribute
    /// neither cost nor risk.
    pub unknown_entities: Vec<String>,
    /// No positive share on any known entity.
    pub degenerate: bool,
}

/// Computes [`ObjectiveScore`]s under a fixed [`ScoringConfig`].
#[derive(Debug, Clone, Default)]
pub struct ObjectiveScorer {
    config: ScoringConfig,
}

impl ObjectiveScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores `allocation` against `table`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_allocate::model::{Allocation, Entity, EntityTable};
    /// use u_allocate::objective::ObjectiveScorer;
    ///
    /// let table = EntityTable::new(vec![
    ///     Entity::new("A", 1000.0, 30.0),
    ///     Entity::new("B", 950.0, 45.0),
    /// ]).unwrap();
    /// let score = ObjectiveScorer::default()
    ///     .score(&Allocation::from([("A", 80.0), ("B", 20.0)]), &table);
    /// assert!((score.cost - 990.0).abs() < 1e-9);
    /// assert!((score.risk - 33.0).abs() < 1e-9);
    /// ```
    pub fn score(&self, allocation: &Allocation, table: &EntityTable) -> ObjectiveScore {
        let mut cost = 0.0;
        let mut weighted_risk = 0.0;
        let mut total_weight = 0.0;
        let mut unknown_entities = Vec::new();

        for (id, share) in allocation.iter() {
            match table.get(id) {
                Some(entity) => {
                    let weight = share / 100.0;
                    cost += weight * entity.cost_per_unit;
                    weighted_risk += weight * entity.risk_score;
                    total_weight += weight;
                }
                None => unknown_entities.push(id.to_string()),
            }
        }

        let degenerate = total_weight <= 0.0;
        let risk = if degenerate {
            0.0
        } else {
            weighted_risk / total_weight
        };

        ObjectiveScore {
            cost,
            risk,
            cost_score: (100.0 - cost / self.config.cost_normalization_divisor).clamp(0.0, 100.0),
            risk_score: (100.0 - risk).clamp(0.0, 100.0),
            unknown_entities,
            degenerate,
        }
    }

    /// Combined score for `score` at the given constraint satisfaction.
    pub fn combine(
        &self,
        target: OptimizationTarget,
        score: &ObjectiveScore,
        satisfaction: f64,
    ) -> f64 {
        self.config
            .combine(target, score.cost_score, score.risk_score, satisfaction)
    }
}
