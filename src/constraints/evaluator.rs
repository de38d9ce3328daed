//! Constraint evaluation.

use super::types::{Constraint, Violation};
use crate::model::Allocation;

/// Result of checking an allocation against a constraint set.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Broken constraints, in constraint order.
    pub violations: Vec<Violation>,
    /// Share of constraints satisfied, in `[0, 100]`.
    pub satisfaction: f64,
}

impl Evaluation {
    pub fn feasible(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Whether entity `id` belongs to the group tagged `tag`.
pub fn in_group(id: &str, tag: &str) -> bool {
    if tag.is_empty() {
        return false;
    }
    id.starts_with(tag) || id.split(|c: char| c == '_' || c == '-').any(|seg| seg == tag)
}

/// Sum of the shares of every entity in group `tag`.
pub fn group_total(allocation: &Allocation, tag: &str) -> f64 {
    allocation
        .iter()
        .filter(|(id, _)| in_group(id, tag))
        .map(|(_, v)| v)
        .sum()
}

fn check(allocation: &Allocation, index: usize, constraint: &Constraint) -> Option<Violation> {
    match constraint {
        Constraint::MaxEntityPercent { entity, limit } => {
            let actual = allocation.get(entity);
            (actual > *limit).then(|| Violation::EntityOverLimit {
                constraint: index,
                entity: entity.clone(),
                actual,
                limit: *limit,
            })
        }
        Constraint::MaxGroupPercent { group, limit } => {
            let actual = group_total(allocation, group);
            (actual > *limit).then(|| Violation::GroupOverLimit {
                constraint: index,
                group: group.clone(),
                actual,
                limit: *limit,
            })
        }
        Constraint::MinActiveEntities { limit } => {
            let active = allocation.active_count();
            (active < *limit).then_some(Violation::TooFewActive {
                constraint: index,
                active,
                required: *limit,
            })
        }
    }
}

/// Checks `allocation` against every constraint.
///
/// Satisfaction is `100 * satisfied / total`, or 100 for an empty set.
///
/// # Examples
///
/// ```
/// use u_allocate::constraints::{evaluate, Constraint};
/// use u_allocate::model::Allocation;
///
/// let alloc = Allocation::from([("A", 80.0), ("B", 20.0)]);
/// let eval = evaluate(&alloc, &[Constraint::max_entity("A", 30.0)]);
/// assert!(!eval.feasible());
/// assert_eq!(eval.satisfaction, 0.0);
/// ```
pub fn evaluate(allocation: &Allocation, constraints: &[Constraint]) -> Evaluation {
    let violations: Vec<Violation> = constraints
        .iter()
        .enumerate()
        .filter_map(|(i, c)| check(allocation, i, c))
        .collect();

    let satisfaction = if constraints.is_empty() {
        100.0
    } else {
        let satisfied = constraints.len() - violations.len();
        100.0 * satisfied as f64 / constraints.len() as f64
    };

    Evaluation {
        violations,
        satisfaction,
    }
}
