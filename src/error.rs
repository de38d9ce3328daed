//! Structural errors.
//!
//! Anything in here aborts a run before the refinement loop starts.
//! Per-iteration anomalies are recovered locally and recorded on the
//! iteration instead (see [`crate::refine::Anomaly`]).

use thiserror::Error;

/// A structural problem with a request or configuration.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "detail", rename_all = "snake_case")
)]
pub enum OptimizeError {
    #[error("entity table is empty; at least one entity is required")]
    EmptyEntityTable,

    #[error("entity `{id}` appears more than once in the entity table")]
    DuplicateEntity { id: String },

    #[error("entity `{id}` is invalid: {reason}")]
    InvalidEntity { id: String, reason: String },

    #[error("constraint #{index} is malformed: {reason}")]
    MalformedConstraint { index: usize, reason: String },

    #[error("initial allocation for `{entity}` is not a finite number")]
    InvalidAllocationValue { entity: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
