//! Refinement loop configuration.

use crate::adjust::AdjustConfig;
use crate::error::OptimizeError;
use crate::objective::ScoringConfig;

/// Hard cap on recorded iterations.
pub const MAX_ITERATIONS: usize = 50;

/// Minimum score gain that counts as an improvement.
pub const CONVERGENCE_THRESHOLD: f64 = 0.1;

/// Consecutive non-improving iterations that end the run.
pub const CONVERGENCE_PATIENCE: usize = 5;

/// Configuration for [`RefineRunner`](super::RefineRunner).
///
/// # Examples
///
/// ```
/// use u_allocate::refine::RefineConfig;
///
/// let config = RefineConfig::default()
///     .with_max_iterations(20)
///     .with_convergence_threshold(0.5)
///     .with_patience(3);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_iterations, 20);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RefineConfig {
    /// Maximum number of iterations recorded in the trace. At least 1.
    pub max_iterations: usize,

    /// Score gain needed to reset the no-improvement counter.
    pub convergence_threshold: f64,

    /// Non-improving iterations tolerated before convergence. At least 1.
    pub patience: usize,

    /// Objective scoring policy.
    pub scoring: ScoringConfig,

    /// Move parameters.
    pub adjust: AdjustConfig,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            convergence_threshold: CONVERGENCE_THRESHOLD,
            patience: CONVERGENCE_PATIENCE,
            scoring: ScoringConfig::default(),
            adjust: AdjustConfig::default(),
        }
    }
}

impl RefineConfig {
    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the score gain that counts as an improvement.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    /// Sets the non-improving iterations tolerated before convergence.
    pub fn with_patience(mut self, n: usize) -> Self {
        self.patience = n;
        self
    }

    /// Sets the objective scoring policy.
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Sets the move parameters.
    pub fn with_adjust(mut self, adjust: AdjustConfig) -> Self {
        self.adjust = adjust;
        self
    }

    /// Validates this configuration and the nested ones.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.max_iterations == 0 {
            return Err(OptimizeError::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        if self.patience == 0 {
            return Err(OptimizeError::InvalidConfig(
                "patience must be at least 1".into(),
            ));
        }
        if !self.convergence_threshold.is_finite() || self.convergence_threshold < 0.0 {
            return Err(OptimizeError::InvalidConfig(format!(
                "convergence_threshold must be a non-negative number, got {}",
                self.convergence_threshold
            )));
        }
        self.scoring.validate()?;
        self.adjust.validate()
    }
}
