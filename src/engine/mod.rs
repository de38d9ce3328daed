//! Request/response entry point.
//!
//! [`AllocationOptimizer`] ties the pieces together:
//!
//! 1. build the [`EntityTable`](crate::model::EntityTable) and validate
//!    constraints and the seed allocation,
//! 2. run the [refinement loop](crate::refine),
//! 3. [select](crate::select) the optimum and alternatives and summarize.
//!
//! Recoverable input problems become [`Diagnostic`]s on the response.
//! Structural ones abort before the loop starts: [`AllocationOptimizer::optimize`]
//! returns an empty response carrying [`Diagnostic::Aborted`], while
//! [`AllocationOptimizer::try_optimize`] returns the error.

mod config;
mod optimizer;
mod types;

pub use config::OptimizerConfig;
pub use optimizer::AllocationOptimizer;
pub use types::{Diagnostic, OptimizationRequest, OptimizationResponse};
