//! Optimizer configuration.

use crate::error::OptimizeError;
use crate::refine::RefineConfig;
use crate::select::MAX_ALTERNATIVES;

/// Configuration for [`AllocationOptimizer`](super::AllocationOptimizer).
///
/// # Examples
///
/// ```
/// use u_allocate::engine::OptimizerConfig;
/// use u_allocate::refine::RefineConfig;
///
/// let config = OptimizerConfig::default()
///     .with_refine(RefineConfig::default().with_max_iterations(30))
///     .with_max_alternatives(2);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_alternatives, 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OptimizerConfig {
    /// Loop, scoring and move parameters.
    pub refine: RefineConfig,

    /// Alternatives reported next to the optimum. At most
    /// [`MAX_ALTERNATIVES`].
    pub max_alternatives: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            refine: RefineConfig::default(),
            max_alternatives: MAX_ALTERNATIVES,
        }
    }
}

impl OptimizerConfig {
    /// Sets the loop, scoring and move parameters.
    pub fn with_refine(mut self, refine: RefineConfig) -> Self {
        self.refine = refine;
        self
    }

    /// Sets the number of alternatives reported next to the optimum.
    pub fn with_max_alternatives(mut self, n: usize) -> Self {
        self.max_alternatives = n;
        self
    }

    /// Validates this configuration and the nested loop configuration.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.max_alternatives > MAX_ALTERNATIVES {
            return Err(OptimizeError::InvalidConfig(format!(
                "max_alternatives must be at most {MAX_ALTERNATIVES}, got {}",
                self.max_alternatives
            )));
        }
        self.refine.validate()
    }
}
