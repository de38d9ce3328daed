//! Which entities have no headroom left under the `Max*` constraints.

use super::evaluator::{group_total, in_group};
use super::types::Constraint;
use crate::model::Allocation;

/// Snapshot of per-entity ceilings for one allocation.
///
/// An entity is *saturated* when its own share has reached a
/// `MaxEntityPercent` limit, or when any group it belongs to has reached its
/// `MaxGroupPercent` limit. Saturated entities must not receive more share.
#[derive(Debug, Clone)]
pub struct Ceilings<'a> {
    allocation: &'a Allocation,
    constraints: &'a [Constraint],
    saturated_groups: Vec<&'a str>,
}

impl<'a> Ceilings<'a> {
    pub fn new(allocation: &'a Allocation, constraints: &'a [Constraint]) -> Self {
        let saturated_groups = constraints
            .iter()
            .filter_map(|c| match c {
                Constraint::MaxGroupPercent { group, limit }
                    if group_total(allocation, group) >= *limit =>
                {
                    Some(group.as_str())
                }
                _ => None,
            })
            .collect();

        Self {
            allocation,
            constraints,
            saturated_groups,
        }
    }

    /// Smallest `MaxEntityPercent` limit for `id`, if any.
    pub fn entity_limit(&self, id: &str) -> Option<f64> {
        self.constraints
            .iter()
            .filter_map(|c| match c {
                Constraint::MaxEntityPercent { entity, limit } if entity == id => Some(*limit),
                _ => None,
            })
            .reduce(f64::min)
    }

    pub fn is_saturated(&self, id: &str) -> bool {
        if let Some(limit) = self.entity_limit(id) {
            if self.allocation.get(id) >= limit {
                return true;
            }
        }
        self.saturated_groups.iter().any(|tag| in_group(id, tag))
    }
}
