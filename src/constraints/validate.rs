//! Pre-run constraint validation against the entity table.

use super::evaluator::in_group;
use super::types::Constraint;
use crate::error::OptimizeError;
use crate::model::EntityTable;

/// Why a constraint was left out of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkipReason {
    /// `MaxEntityPercent` names an id that is not in the entity table.
    UnknownEntity,
    /// `MaxGroupPercent` tag matches no entity in the table.
    EmptyGroup,
}

/// A constraint dropped before the run, with its position in the request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkippedConstraint {
    pub index: usize,
    pub constraint: Constraint,
    pub reason: SkipReason,
}

/// Constraints that survived validation, plus what was dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedConstraints {
    /// Constraints the loop evaluates, in request order.
    pub active: Vec<Constraint>,
    /// Request index of each entry of `active`.
    pub active_indices: Vec<usize>,
    pub skipped: Vec<SkippedConstraint>,
    /// Request indices of `MinActiveEntities` constraints asking for more
    /// entities than the table holds. They stay active.
    pub unreachable_minimums: Vec<usize>,
}

fn malformed(index: usize, reason: &str) -> OptimizeError {
    OptimizeError::MalformedConstraint {
        index,
        reason: reason.to_string(),
    }
}

fn check_limit(index: usize, limit: f64) -> Result<(), OptimizeError> {
    if !limit.is_finite() {
        return Err(malformed(index, "limit is not a finite number"));
    }
    if limit < 0.0 {
        return Err(malformed(index, "limit is negative"));
    }
    Ok(())
}

/// Splits `constraints` into the ones a run can evaluate and the ones that
/// reference nothing in `table`.
///
/// # Errors
///
/// Returns [`OptimizeError::MalformedConstraint`] for a negative or
/// non-finite limit, or an empty entity id / group tag.
pub fn validate_constraints(
    constraints: &[Constraint],
    table: &EntityTable,
) -> Result<ValidatedConstraints, OptimizeError> {
    let mut out = ValidatedConstraints::default();

    for (index, constraint) in constraints.iter().enumerate() {
        let skip = match constraint {
            Constraint::MaxEntityPercent { entity, limit } => {
                check_limit(index, *limit)?;
                if entity.is_empty() {
                    return Err(malformed(index, "entity id is empty"));
                }
                (!table.contains(entity)).then_some(SkipReason::UnknownEntity)
            }
            Constraint::MaxGroupPercent { group, limit } => {
                check_limit(index, *limit)?;
                if group.is_empty() {
                    return Err(malformed(index, "group tag is empty"));
                }
                let has_member = table.iter().any(|e| in_group(&e.id, group));
                (!has_member).then_some(SkipReason::EmptyGroup)
            }
            Constraint::MinActiveEntities { limit } => {
                if *limit > table.len() {
                    out.unreachable_minimums.push(index);
                }
                None
            }
        };

        match skip {
            Some(reason) => out.skipped.push(SkippedConstraint {
                index,
                constraint: constraint.clone(),
                reason,
            }),
            None => {
                out.active.push(constraint.clone());
                out.active_indices.push(index);
            }
        }
    }

    Ok(out)
}
