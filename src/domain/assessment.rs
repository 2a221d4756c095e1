//! Scoring output types.
//!
//! Represents the interpreted output of the diabetes risk model.

use serde::Serialize;

use super::patient::{PatientRecord, SchemaError};
use super::thresholds::Thresholds;

/// Error type for a failed scoring call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("Model evaluation failed: {0}")]
    Model(String),

    #[error("Scoring function returned {0}, expected a probability in [0, 1]")]
    InvalidProbability(f64),

    #[error("Record does not match model schema: {0}")]
    Schema(#[from] SchemaError),
}

/// Risk tier for diabetes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskTier {
    /// Low risk of diabetes
    Low,
    /// Moderate risk, lifestyle changes and monitoring suggested
    Moderate,
    /// High risk, consultation advised
    High,
}

impl RiskTier {
    /// Display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    /// The advisory message for this tier.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Low => "Low risk. Maintain a healthy lifestyle.",
            Self::Moderate => {
                "Moderate risk. Consider improving diet, exercise, and regular monitoring."
            }
            Self::High => {
                "High risk detected. Please consult a healthcare professional immediately."
            }
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (16, 185, 129),      // Emerald (#10B981)
            Self::Moderate => (251, 191, 36), // Amber (#FBBF24)
            Self::High => (244, 63, 94),      // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Binary positive/negative decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum Decision {
    Negative,
    Positive,
}

impl Decision {
    #[must_use]
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Positive => 1,
        }
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Positive)
    }
}

impl From<Decision> for u8 {
    fn from(d: Decision) -> Self {
        d.as_u8()
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => write!(f, "Negative (0)"),
            Self::Positive => write!(f, "Positive (1)"),
        }
    }
}

/// Interpreted result of one scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    probability: f64,
    tier: RiskTier,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    decision: Option<Decision>,
}

impl ScoreResult {
    /// Classify a raw probability against the given thresholds.
    ///
    /// # Errors
    /// Returns `ScoringError::InvalidProbability` for NaN or values outside `[0, 1]`.
    pub fn classify(probability: f64, thresholds: &Thresholds) -> Result<Self, ScoringError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ScoringError::InvalidProbability(probability));
        }

        let tier = thresholds.tier_for(probability);
        Ok(Self {
            probability,
            tier,
            message: tier.advice(),
            decision: thresholds.decision_for(probability),
        })
    }

    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    #[must_use]
    pub fn tier(&self) -> RiskTier {
        self.tier
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.message
    }

    #[must_use]
    pub fn decision(&self) -> Option<Decision> {
        self.decision
    }

    /// Probability formatted as a percentage, e.g. `42.17%`.
    #[must_use]
    pub fn percent(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }
}

/// A scored record, as handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    /// Echo of the submitted input
    pub record: PatientRecord,

    pub result: ScoreResult,

    pub assessed_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    #[must_use]
    pub fn new(record: PatientRecord, result: ScoreResult) -> Self {
        Self {
            record,
            result,
            assessed_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ThresholdPolicy;

    #[test]
    fn test_classify_rejects_out_of_range() {
        let t = Thresholds::default();
        assert_eq!(
            ScoreResult::classify(1.5, &t),
            Err(ScoringError::InvalidProbability(1.5))
        );
        assert_eq!(
            ScoreResult::classify(-0.1, &t),
            Err(ScoringError::InvalidProbability(-0.1))
        );
        assert!(matches!(
            ScoreResult::classify(f64::NAN, &t),
            Err(ScoringError::InvalidProbability(p)) if p.is_nan()
        ));
    }

    #[test]
    fn test_message_follows_tier() {
        let t = ThresholdPolicy::Baseline.thresholds();
        for p in [0.0, 0.1, 0.35, 0.59, 0.6, 0.95, 1.0] {
            let result = ScoreResult::classify(p, &t).expect("valid probability");
            assert_eq!(result.message(), result.tier().advice());
        }
    }

    #[test]
    fn test_each_tier_has_distinct_advice() {
        assert_ne!(RiskTier::Low.advice(), RiskTier::Moderate.advice());
        assert_ne!(RiskTier::Moderate.advice(), RiskTier::High.advice());
        assert!(RiskTier::High.advice().contains("healthcare professional"));
    }

    #[test]
    fn test_percent_formatting() {
        let t = Thresholds::default();
        let result = ScoreResult::classify(0.4217, &t).expect("valid");
        assert_eq!(result.percent(), "42.17%");
    }

    #[test]
    fn test_serialized_shape() {
        let t = ThresholdPolicy::Conservative.thresholds();
        let result = ScoreResult::classify(0.85, &t).expect("valid");
        let json = serde_json::to_value(result).expect("serialize");

        assert_eq!(json["tier"], "High");
        assert_eq!(json["decision"], 1);
        assert_eq!(json["message"], RiskTier::High.advice());

        let no_cutoff = t.with_cutoff(None).expect("valid");
        let result = ScoreResult::classify(0.85, &no_cutoff).expect("valid");
        let json = serde_json::to_value(result).expect("serialize");
        assert!(json.get("decision").is_none());
    }

    #[test]
    fn test_tier_ordering() {
        assert!(RiskTier::Low < RiskTier::Moderate);
        assert!(RiskTier::Moderate < RiskTier::High);
        assert_eq!(RiskTier::Moderate.to_string(), "Moderate");
    }
}
