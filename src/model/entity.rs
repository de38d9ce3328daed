//! Entities, the validated entity table, and optimization targets.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::OptimizeError;

/// Which objective a run optimizes for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OptimizationTarget {
    /// Favour the lowest total cost.
    MinCost,
    /// Favour the lowest weighted risk.
    MinRisk,
    /// Weigh cost and risk equally.
    #[default]
    Balanced,
}

impl OptimizationTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationTarget::MinCost => "min_cost",
            OptimizationTarget::MinRisk => "min_risk",
            OptimizationTarget::Balanced => "balanced",
        }
    }
}

impl fmt::Display for OptimizationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizationTarget {
    type Err = OptimizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min_cost" => Ok(OptimizationTarget::MinCost),
            "min_risk" => Ok(OptimizationTarget::MinRisk),
            "balanced" => Ok(OptimizationTarget::Balanced),
            other => Err(OptimizeError::InvalidConfig(format!(
                "unknown optimization target `{other}`"
            ))),
        }
    }
}

/// A candidate supplier or region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    /// Identifier used as the allocation key.
    pub id: String,
    /// Cost per unit of volume. Non-negative.
    pub cost_per_unit: f64,
    /// Risk score in `[0, 100]`. Higher is riskier.
    pub risk_score: f64,
}

impl Entity {
    pub fn new(id: impl Into<String>, cost_per_unit: f64, risk_score: f64) -> Self {
        Self {
            id: id.into(),
            cost_per_unit,
            risk_score,
        }
    }

    fn validate(&self) -> Result<(), OptimizeError> {
        let invalid = |reason: &str| OptimizeError::InvalidEntity {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.id.is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if !self.cost_per_unit.is_finite() || self.cost_per_unit < 0.0 {
            return Err(invalid("cost_per_unit must be a non-negative number"));
        }
        if !self.risk_score.is_finite() || !(0.0..=100.0).contains(&self.risk_score) {
            return Err(invalid("risk_score must be within [0, 100]"));
        }
        Ok(())
    }
}

/// Validated, ordered entity table with id lookup.
///
/// Table order is preserved and used as the final tie-break wherever two
/// entities rank equally.
///
/// # Examples
///
/// ```
/// use u_allocate::model::{Entity, EntityTable};
///
/// let table = EntityTable::new(vec![
///     Entity::new("A", 1000.0, 30.0),
///     Entity::new("B", 950.0, 45.0),
/// ]).unwrap();
/// assert_eq!(table.len(), 2);
/// assert!(table.contains("B"));
/// ```
#[derive(Debug, Clone)]
pub struct EntityTable {
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
    max_cost: f64,
}

impl EntityTable {
    /// Builds a table, rejecting empty input, duplicate ids and
    /// out-of-range numbers.
    pub fn new(entities: Vec<Entity>) -> Result<Self, OptimizeError> {
        if entities.is_empty() {
            return Err(OptimizeError::EmptyEntityTable);
        }

        let mut index = HashMap::with_capacity(entities.len());
        for (i, entity) in entities.iter().enumerate() {
            entity.validate()?;
            if index.insert(entity.id.clone(), i).is_some() {
                return Err(OptimizeError::DuplicateEntity {
                    id: entity.id.clone(),
                });
            }
        }

        let max_cost = entities
            .iter()
            .map(|e| e.cost_per_unit)
            .fold(0.0_f64, f64::max);

        Ok(Self {
            entities,
            index,
            max_cost,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&i| &self.entities[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of `id` in table order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn max_cost(&self) -> f64 {
        self.max_cost
    }

    /// Ranking key for `entity` under `target`. Lower is better.
    ///
    /// - `MinCost`: unit cost.
    /// - `MinRisk`: risk score.
    /// - `Balanced`: mean of unit cost scaled to `[0, 100]` against the most
    ///   expensive entity, and risk score.
    pub fn rank_key(&self, entity: &Entity, target: OptimizationTarget) -> f64 {
        match target {
            OptimizationTarget::MinCost => entity.cost_per_unit,
            OptimizationTarget::MinRisk => entity.risk_score,
            OptimizationTarget::Balanced => {
                let cost_pct = if self.max_cost > 0.0 {
                    entity.cost_per_unit / self.max_cost * 100.0
                } else {
                    0.0
                };
                (cost_pct + entity.risk_score) / 2.0
            }
        }
    }

    /// Entities ordered best-first by [`rank_key`](Self::rank_key), ties in
    /// table order.
    pub fn ranked(&self, target: OptimizationTarget) -> Vec<&Entity> {
        let mut ranked: Vec<(usize, f64, &Entity)> = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, e)| (i, self.rank_key(e, target), e))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        ranked.into_iter().map(|(_, _, e)| e).collect()
    }
}

impl<'a> IntoIterator for &'a EntityTable {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> EntityTable {
        EntityTable::new(vec![
            Entity::new("Supplier_A", 1000.0, 30.0),
            Entity::new("Supplier_B", 950.0, 45.0),
            Entity::new("Region_India", 980.0, 50.0),
            Entity::new("Region_Thailand", 1020.0, 35.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(
            EntityTable::new(vec![]).unwrap_err(),
            OptimizeError::EmptyEntityTable
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = EntityTable::new(vec![
            Entity::new("A", 1.0, 1.0),
            Entity::new("A", 2.0, 2.0),
        ])
        .unwrap_err();
        assert_eq!(err, OptimizeError::DuplicateEntity { id: "A".into() });
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(EntityTable::new(vec![Entity::new("A", -1.0, 10.0)]).is_err());
        assert!(EntityTable::new(vec![Entity::new("A", 1.0, 101.0)]).is_err());
        assert!(EntityTable::new(vec![Entity::new("A", f64::NAN, 10.0)]).is_err());
        assert!(EntityTable::new(vec![Entity::new("", 1.0, 10.0)]).is_err());
    }

    #[test]
    fn test_lookup_and_order() {
        let t = table();
        assert_eq!(t.position("Region_India"), Some(2));
        assert!((t.get("Supplier_B").unwrap().cost_per_unit - 950.0).abs() < 1e-12);
        assert!(t.get("missing").is_none());
        assert!((t.max_cost() - 1020.0).abs() < 1e-12);
    }

    #[test]
    fn test_ranked_by_target() {
        let t = table();
        let ids = |target| {
            t.ranked(target)
                .into_iter()
                .map(|e| e.id.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(
            ids(OptimizationTarget::MinCost),
            vec!["Supplier_B", "Region_India", "Supplier_A", "Region_Thailand"]
        );
        assert_eq!(
            ids(OptimizationTarget::MinRisk),
            vec!["Supplier_A", "Region_Thailand", "Supplier_B", "Region_India"]
        );
        // Balanced: A=64.02, T=67.5, B=69.07, I=73.04
        assert_eq!(
            ids(OptimizationTarget::Balanced),
            vec!["Supplier_A", "Region_Thailand", "Supplier_B", "Region_India"]
        );
    }

    #[test]
    fn test_ranked_ties_keep_table_order() {
        let t = EntityTable::new(vec![
            Entity::new("X", 10.0, 10.0),
            Entity::new("Y", 10.0, 10.0),
        ])
        .unwrap();
        let first = t.ranked(OptimizationTarget::MinCost)[0];
        assert_eq!(first.id, "X");
    }

    #[test]
    fn test_target_parse() {
        assert_eq!(
            "min_cost".parse::<OptimizationTarget>().unwrap(),
            OptimizationTarget::MinCost
        );
        assert_eq!(
            " Balanced ".parse::<OptimizationTarget>().unwrap(),
            OptimizationTarget::Balanced
        );
        assert!("cheapest".parse::<OptimizationTarget>().is_err());
        assert_eq!(OptimizationTarget::MinRisk.to_string(), "min_risk");
    }
}
