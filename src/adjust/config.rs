//! Move parameters.

use crate::error::OptimizeError;

/// Fraction of its own share each donor gives up in a constraint-fix.
pub const SHRINK_FRACTION: f64 = 0.05;

/// Number of largest shares shrunk by a constraint-fix.
pub const DONOR_COUNT: usize = 2;

/// Maximum number of entities receiving freed share in a constraint-fix.
pub const RECEIVER_COUNT: usize = 3;

/// Percentage points moved by a fine-tune.
pub const FINE_TUNE_STEP: f64 = 2.0;

/// Percentage points moved by a rebalance.
pub const REBALANCE_STEP: f64 = 1.0;

/// A feasible iteration scoring above this is fine-tuned instead of
/// rebalanced.
pub const FINE_TUNE_SCORE_THRESHOLD: f64 = 80.0;

/// Under `MinCost`, total cost above this suggests shifting volume.
pub const COST_ALERT_THRESHOLD: f64 = 50_000.0;

/// Under `MinRisk`, weighted risk above this suggests diversifying.
pub const RISK_ALERT_THRESHOLD: f64 = 60.0;

/// Recommendations kept per iteration.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Parameters of the three adjustment moves and of the recommendations
/// attached to each iteration.
///
/// # Examples
///
/// ```
/// use u_allocate::adjust::AdjustConfig;
///
/// let config = AdjustConfig::default()
///     .with_shrink_fraction(0.1)
///     .with_fine_tune_threshold(75.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AdjustConfig {
    /// Multiplicative shrink applied to each donor, in (0, 1).
    pub shrink_fraction: f64,

    /// Number of donors in a constraint-fix.
    pub donor_count: usize,

    /// Maximum receivers in a constraint-fix.
    pub receiver_count: usize,

    /// Points moved by fine-tune.
    pub fine_tune_step: f64,

    /// Points moved by rebalance.
    pub rebalance_step: f64,

    /// Score above which a feasible iteration is fine-tuned.
    pub fine_tune_threshold: f64,

    pub cost_alert_threshold: f64,

    pub risk_alert_threshold: f64,

    pub max_recommendations: usize,
}

impl Default for AdjustConfig {
    fn default() -> Self {
        Self {
            shrink_fraction: SHRINK_FRACTION,
            donor_count: DONOR_COUNT,
            receiver_count: RECEIVER_COUNT,
            fine_tune_step: FINE_TUNE_STEP,
            rebalance_step: REBALANCE_STEP,
            fine_tune_threshold: FINE_TUNE_SCORE_THRESHOLD,
            cost_alert_threshold: COST_ALERT_THRESHOLD,
            risk_alert_threshold: RISK_ALERT_THRESHOLD,
            max_recommendations: MAX_RECOMMENDATIONS,
        }
    }
}

impl AdjustConfig {
    /// Sets the fraction each constraint-fix donor gives up.
    pub fn with_shrink_fraction(mut self, f: f64) -> Self {
        self.shrink_fraction = f;
        self
    }

    /// Sets how many of the largest shares donate during a constraint fix.
    pub fn with_donor_count(mut self, n: usize) -> Self {
        self.donor_count = n;
        self
    }

    /// Sets the maximum number of constraint-fix receivers.
    pub fn with_receiver_count(mut self, n: usize) -> Self {
        self.receiver_count = n;
        self
    }

    /// Sets the points moved by one fine-tune.
    pub fn with_fine_tune_step(mut self, points: f64) -> Self {
        self.fine_tune_step = points;
        self
    }

    /// Sets the points moved by one rebalance.
    pub fn with_rebalance_step(mut self, points: f64) -> Self {
        self.rebalance_step = points;
        self
    }

    /// Sets the score a feasible allocation must exceed to be fine-tuned.
    pub fn with_fine_tune_threshold(mut self, score: f64) -> Self {
        self.fine_tune_threshold = score;
        self
    }

    /// Sets the maximum number of recommendations per iteration.
    pub fn with_max_recommendations(mut self, n: usize) -> Self {
        self.max_recommendations = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if !(self.shrink_fraction > 0.0 && self.shrink_fraction < 1.0) {
            return Err(OptimizeError::InvalidConfig(format!(
                "shrink_fraction must be in (0, 1), got {}",
                self.shrink_fraction
            )));
        }
        if self.donor_count == 0 {
            return Err(OptimizeError::InvalidConfig(
                "donor_count must be at least 1".into(),
            ));
        }
        for (name, step) in [
            ("fine_tune_step", self.fine_tune_step),
            ("rebalance_step", self.rebalance_step),
        ] {
            if !(step.is_finite() && step > 0.0 && step <= 100.0) {
                return Err(OptimizeError::InvalidConfig(format!(
                    "{name} must be in (0, 100], got {step}"
                )));
            }
        }
        if !self.fine_tune_threshold.is_finite() {
            return Err(OptimizeError::InvalidConfig(
                "fine_tune_threshold must be finite".into(),
            ));
        }
        Ok(())
    }
}
