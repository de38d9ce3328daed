//! Constraint and violation records.

use std::fmt;

/// A hard rule an allocation must satisfy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Constraint {
    /// A single entity may hold at most `limit` percent.
    MaxEntityPercent { entity: String, limit: f64 },

    /// All entities of a group together may hold at most `limit` percent.
    MaxGroupPercent { group: String, limit: f64 },

    /// At least `limit` entities must hold a positive share.
    MinActiveEntities { limit: usize },
}

impl Constraint {
    pub fn max_entity(entity: impl Into<String>, limit: f64) -> Self {
        Constraint::MaxEntityPercent {
            entity: entity.into(),
            limit,
        }
    }

    pub fn max_group(group: impl Into<String>, limit: f64) -> Self {
        Constraint::MaxGroupPercent {
            group: group.into(),
            limit,
        }
    }

    pub fn min_active(limit: usize) -> Self {
        Constraint::MinActiveEntities { limit }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::MaxEntityPercent { entity, limit } => {
                write!(f, "{entity} <= {limit}%")
            }
            Constraint::MaxGroupPercent { group, limit } => {
                write!(f, "group {group} <= {limit}%")
            }
            Constraint::MinActiveEntities { limit } => {
                write!(f, "at least {limit} active entities")
            }
        }
    }
}

/// A constraint that the evaluated allocation breaks.
///
/// `constraint` is the position of the broken constraint in the caller's
/// constraint list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Violation {
    EntityOverLimit {
        constraint: usize,
        entity: String,
        actual: f64,
        limit: f64,
    },
    GroupOverLimit {
        constraint: usize,
        group: String,
        actual: f64,
        limit: f64,
    },
    TooFewActive {
        constraint: usize,
        active: usize,
        required: usize,
    },
}

impl Violation {
    /// Position of the broken constraint.
    pub fn constraint_index(&self) -> usize {
        match self {
            Violation::EntityOverLimit { constraint, .. }
            | Violation::GroupOverLimit { constraint, .. }
            | Violation::TooFewActive { constraint, .. } => *constraint,
        }
    }

    /// Rewrites the constraint position, e.g. from an index into a filtered
    /// list back to the caller's numbering.
    pub fn set_constraint_index(&mut self, index: usize) {
        match self {
            Violation::EntityOverLimit { constraint, .. }
            | Violation::GroupOverLimit { constraint, .. }
            | Violation::TooFewActive { constraint, .. } => *constraint = index,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::EntityOverLimit {
                entity,
                actual,
                limit,
                ..
            } => write!(f, "Entity {entity}: {actual:.1}% exceeds max {limit}%"),
            Violation::GroupOverLimit {
                group,
                actual,
                limit,
                ..
            } => write!(f, "Group {group}: {actual:.1}% exceeds max {limit}%"),
            Violation::TooFewActive {
                active,
                required,
                ..
            } => write!(
                f,
                "Only {active} entities active, minimum {required} required"
            ),
        }
    }
}
