//! Iterative allocation refinement.
//!
//! A greedy, memoryless local search: every iteration evaluates the current
//! allocation, records it in the trace, and applies one adjustment move to
//! obtain the next allocation. There is no backtracking.
//!
//! # State machine
//!
//! ```text
//! Running ──(no improvement for `patience` iterations)──▶ Converged
//!    │
//!    ├──(max_iterations recorded)──▶ MaxIterationsReached
//!    │
//!    └──(cancel flag set)──────────▶ Cancelled
//! ```
//!
//! An iteration *improves* when its combined score exceeds the best score so
//! far by more than `convergence_threshold`. The iteration that trips a
//! terminal state stays in the trace.

mod config;
mod runner;
mod types;

pub use config::{RefineConfig, CONVERGENCE_PATIENCE, CONVERGENCE_THRESHOLD, MAX_ITERATIONS};
pub use runner::{RefineOutcome, RefineProblem, RefineRunner};
pub use types::{Anomaly, Iteration, LoopState};
