//! Scoring policy constants and configuration.

use crate::error::OptimizeError;
use crate::model::OptimizationTarget;

/// Total cost is divided by this before being subtracted from 100.
pub const COST_NORMALIZATION_DIVISOR: f64 = 10_000.0;

/// Weight of the targeted objective under `MinCost` / `MinRisk`.
pub const PRIMARY_OBJECTIVE_WEIGHT: f64 = 0.6;

/// Weight of the cost score under `Balanced`.
pub const BALANCED_COST_WEIGHT: f64 = 0.3;

/// Weight of the risk score under `Balanced`.
pub const BALANCED_RISK_WEIGHT: f64 = 0.3;

/// Weight of constraint satisfaction under every target.
pub const SATISFACTION_WEIGHT: f64 = 0.4;

/// Scoring policy.
///
/// # Examples
///
/// ```
/// use u_allocate::objective::ScoringConfig;
/// use u_allocate::model::OptimizationTarget;
///
/// let config = ScoringConfig::default();
/// let score = config.combine(OptimizationTarget::MinCost, 90.0, 50.0, 100.0);
/// assert!((score - 94.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoringConfig {
    /// Divisor applied to total cost before normalization.
    pub cost_normalization_divisor: f64,

    /// Weight of the targeted objective for single-objective targets.
    pub primary_weight: f64,

    /// Cost weight for `Balanced`.
    pub balanced_cost_weight: f64,

    /// Risk weight for `Balanced`.
    pub balanced_risk_weight: f64,

    /// Constraint satisfaction weight.
    pub satisfaction_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            cost_normalization_divisor: COST_NORMALIZATION_DIVISOR,
            primary_weight: PRIMARY_OBJECTIVE_WEIGHT,
            balanced_cost_weight: BALANCED_COST_WEIGHT,
            balanced_risk_weight: BALANCED_RISK_WEIGHT,
            satisfaction_weight: SATISFACTION_WEIGHT,
        }
    }
}

impl ScoringConfig {
    /// Sets the divisor applied to total cost before normalization.
    pub fn with_cost_normalization_divisor(mut self, divisor: f64) -> Self {
        self.cost_normalization_divisor = divisor;
        self
    }

    /// Sets the weight of the targeted objective for `MinCost` and `MinRisk`.
    pub fn with_primary_weight(mut self, w: f64) -> Self {
        self.primary_weight = w;
        self
    }

    /// Sets the cost and risk weights used by `Balanced`.
    pub fn with_balanced_weights(mut self, cost: f64, risk: f64) -> Self {
        self.balanced_cost_weight = cost;
        self.balanced_risk_weight = risk;
        self
    }

    /// Sets the weight of constraint satisfaction.
    pub fn with_satisfaction_weight(mut self, w: f64) -> Self {
        self.satisfaction_weight = w;
        self
    }

    /// Combines normalized scores and satisfaction into one score.
    ///
    /// All inputs are expected in `[0, 100]`; with the default weights the
    /// result is as well.
    pub fn combine(
        &self,
        target: OptimizationTarget,
        cost_score: f64,
        risk_score: f64,
        satisfaction: f64,
    ) -> f64 {
        let constraint_part = self.satisfaction_weight * satisfaction;
        match target {
            OptimizationTarget::MinCost => self.primary_weight * cost_score + constraint_part,
            OptimizationTarget::MinRisk => self.primary_weight * risk_score + constraint_part,
            OptimizationTarget::Balanced => {
                self.balanced_cost_weight * cost_score
                    + self.balanced_risk_weight * risk_score
                    + constraint_part
            }
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if !(self.cost_normalization_divisor.is_finite() && self.cost_normalization_divisor > 0.0)
        {
            return Err(OptimizeError::InvalidConfig(
                "cost_normalization_divisor must be positive".into(),
            ));
        }
        let weights = [
            ("primary_weight", self.primary_weight),
            ("balanced_cost_weight", self.balanced_cost_weight),
            ("balanced_risk_weight", self.balanced_risk_weight),
            ("satisfaction_weight", self.satisfaction_weight),
        ];
        for (name, w) in weights {
            if !w.is_finite() || w < 0.0 {
                return Err(OptimizeError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {w}"
                )));
            }
        }
        Ok(())
    }
}
