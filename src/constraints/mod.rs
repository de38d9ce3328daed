//! Hard constraints on an allocation.
//!
//! A run is *feasible* when [`evaluate`] reports no violations. Before the
//! refinement loop starts, [`validate_constraints`] drops constraints that
//! reference entities or groups the table does not contain and rejects
//! malformed limits outright.
//!
//! # Group membership
//!
//! `MaxGroupPercent` matches an entity id when the id starts with the group
//! tag or when one of its `_`/`-` separated segments equals the tag, so the
//! tag `India` covers both `India_North` and `Region_India`.

mod ceiling;
mod evaluator;
mod types;
mod validate;

pub use ceiling::Ceilings;
pub use evaluator::{evaluate, group_total, in_group, Evaluation};
pub use types::{Constraint, Violation};
pub use validate::{validate_constraints, SkipReason, SkippedConstraint, ValidatedConstraints};
