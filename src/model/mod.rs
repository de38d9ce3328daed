//! Problem data shared by every engine stage.
//!
//! - [`Entity`] / [`EntityTable`]: the candidate suppliers or regions with
//!   their unit cost and risk score. Read-only for the duration of a run.
//! - [`Allocation`]: percentage of spend per entity id. Every iteration owns
//!   its own copy.
//! - [`OptimizationTarget`]: which objective the run favours.

mod allocation;
mod entity;

pub use allocation::{clamp_percent, Allocation};
pub use entity::{Entity, EntityTable, OptimizationTarget};
