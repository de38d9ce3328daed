//! Constrained allocation refinement engine.
//!
//! Given a starting percentage allocation of spend across candidate
//! entities (suppliers, regions), a set of hard constraints and an
//! optimization target, the engine repairs and refines the allocation
//! iteratively, then reports one optimal solution plus a few alternatives.
//!
//! - **Model**: entities, the validated entity table, allocations and
//!   optimization targets.
//! - **Constraints**: per-entity caps, group caps and minimum active
//!   entities; pure evaluation into violations and a satisfaction rate.
//! - **Objective**: weighted cost and risk, normalized into a combined
//!   score per target.
//! - **Adjust**: constraint-fix, fine-tune and rebalance moves, plus
//!   human-facing recommendations.
//! - **Refine**: the greedy loop with convergence, iteration cap and
//!   cancellation.
//! - **Select**: optimum and alternatives from the feasible iterations,
//!   with summary statistics.
//! - **Engine**: the request/response façade with input diagnostics.
//!
//! # Architecture
//!
//! A bounded local-search heuristic, not an exact solver. Runs are
//! single-threaded and deterministic; with the `parallel` feature,
//! independent requests can be batched on the rayon pool. Events are
//! emitted through `tracing`; installing a subscriber is left to the
//! caller.
//!
//! # Example
//!
//! ```
//! use u_allocate::{AllocationOptimizer, Allocation, Constraint, Entity,
//!     OptimizationRequest, OptimizationTarget, OptimizerConfig};
//!
//! let request = OptimizationRequest::new(
//!     vec![
//!         Entity::new("Supplier_A", 1000.0, 30.0),
//!         Entity::new("Supplier_B", 950.0, 45.0),
//!     ],
//!     Allocation::from([("Supplier_A", 50.0), ("Supplier_B", 50.0)]),
//! )
//! .with_constraints(vec![Constraint::max_entity("Supplier_A", 60.0)])
//! .with_target(OptimizationTarget::MinCost);
//!
//! let response = AllocationOptimizer::new(OptimizerConfig::default())
//!     .unwrap()
//!     .optimize(&request);
//! assert!(response.optimal.is_some());
//! ```

pub mod adjust;
pub mod constraints;
pub mod engine;
pub mod error;
pub mod model;
pub mod objective;
pub mod refine;
pub mod select;

#[cfg(feature = "wasm")]
mod wasm;

pub use constraints::{Constraint, Violation};
pub use engine::{
    AllocationOptimizer, Diagnostic, OptimizationRequest, OptimizationResponse, OptimizerConfig,
};
pub use error::OptimizeError;
pub use model::{Allocation, Entity, EntityTable, OptimizationTarget};
