//! Decision thresholds: tier band boundaries and the binary cutoff.
//!
//! Bands are closed-open: `[0, low) → Low`, `[low, moderate_high) → Moderate`,
//! `[moderate_high, 1] → High`. The cutoff is independent of the bands.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::assessment::{Decision, RiskTier};

/// Error type for invalid threshold configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Threshold {name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("Threshold {name}={value} out of range {range}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("Bands are not ordered: low={low} must be below moderate_high={moderate_high}")]
    Unordered { low: f64, moderate_high: f64 },

    #[error("Unknown threshold policy {0:?} (expected baseline, conservative or sensitive)")]
    UnknownPolicy(String),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Failed to read thresholds file {path}: {reason}")]
    Read { path: String, reason: String },
}

/// Validated threshold set.
///
/// Only constructible through [`Thresholds::new`] (or deserialization, which
/// runs the same checks), so every instance forms valid ordered bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds")]
pub struct Thresholds {
    low: f64,
    moderate_high: f64,
    cutoff: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawThresholds {
    low: f64,
    moderate_high: f64,
    #[serde(default)]
    cutoff: Option<f64>,
}

impl TryFrom<RawThresholds> for Thresholds {
    type Error = ConfigError;

    fn try_from(raw: RawThresholds) -> Result<Self, Self::Error> {
        Self::new(raw.low, raw.moderate_high, raw.cutoff)
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

impl Thresholds {
    /// Build a validated threshold set.
    ///
    /// Requires `0 < low < moderate_high <= 1` and, when present, `0 <= cutoff <= 1`.
    ///
    /// # Errors
    /// Returns `ConfigError` if the values do not form valid ordered bands.
    pub fn new(low: f64, moderate_high: f64, cutoff: Option<f64>) -> Result<Self, ConfigError> {
        check_finite("low", low)?;
        check_finite("moderate_high", moderate_high)?;

        if low <= 0.0 || low >= 1.0 {
            return Err(ConfigError::OutOfRange {
                name: "low",
                value: low,
                range: "(0, 1)",
            });
        }
        if moderate_high <= 0.0 || moderate_high > 1.0 {
            return Err(ConfigError::OutOfRange {
                name: "moderate_high",
                value: moderate_high,
                range: "(0, 1]",
            });
        }
        if low >= moderate_high {
            return Err(ConfigError::Unordered { low, moderate_high });
        }

        if let Some(c) = cutoff {
            check_finite("cutoff", c)?;
            if !(0.0..=1.0).contains(&c) {
                return Err(ConfigError::OutOfRange {
                    name: "cutoff",
                    value: c,
                    range: "[0, 1]",
                });
            }
        }

        Ok(Self {
            low,
            moderate_high,
            cutoff,
        })
    }

    /// Lower bound of the Moderate band.
    #[must_use]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Lower bound of the High band.
    #[must_use]
    pub fn moderate_high(&self) -> f64 {
        self.moderate_high
    }

    /// Binary decision cutoff, if enabled.
    #[must_use]
    pub fn cutoff(&self) -> Option<f64> {
        self.cutoff
    }

    /// Same bands, different cutoff.
    ///
    /// # Errors
    /// Returns `ConfigError` if the cutoff is invalid.
    pub fn with_cutoff(self, cutoff: Option<f64>) -> Result<Self, ConfigError> {
        Self::new(self.low, self.moderate_high, cutoff)
    }

    /// Map a probability in `[0, 1]` to its tier.
    #[must_use]
    pub fn tier_for(&self, probability: f64) -> RiskTier {
        if probability < self.low {
            RiskTier::Low
        } else if probability < self.moderate_high {
            RiskTier::Moderate
        } else {
            RiskTier::High
        }
    }

    /// Binary decision for a probability; `None` when no cutoff is configured.
    #[must_use]
    pub fn decision_for(&self, probability: f64) -> Option<Decision> {
        self.cutoff.map(|cutoff| {
            if probability > cutoff {
                Decision::Positive
            } else {
                Decision::Negative
            }
        })
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        ThresholdPolicy::default().thresholds()
    }
}

/// Named threshold presets seen across deployments of the predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdPolicy {
    /// low 0.3, moderate/high 0.6, cutoff 0.5
    #[default]
    Baseline,
    /// low 0.3, moderate/high 0.7, cutoff 0.5
    Conservative,
    /// low 0.3, moderate/high 0.7, cutoff 0.3
    Sensitive,
}

impl ThresholdPolicy {
    pub const ALL: [ThresholdPolicy; 3] = [Self::Baseline, Self::Conservative, Self::Sensitive];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Conservative => "conservative",
            Self::Sensitive => "sensitive",
        }
    }

    /// The preset's threshold values.
    #[must_use]
    pub fn thresholds(&self) -> Thresholds {
        let (low, moderate_high, cutoff) = match self {
            Self::Baseline => (0.3, 0.6, 0.5),
            Self::Conservative => (0.3, 0.7, 0.5),
            Self::Sensitive => (0.3, 0.7, 0.3),
        };
        Thresholds {
            low,
            moderate_high,
            cutoff: Some(cutoff),
        }
    }
}

impl std::fmt::Display for ThresholdPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThresholdPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownPolicy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for policy in ThresholdPolicy::ALL {
            let t = policy.thresholds();
            let revalidated = Thresholds::new(t.low(), t.moderate_high(), t.cutoff())
                .expect("preset must validate");
            assert_eq!(t, revalidated);
        }
        assert_eq!(Thresholds::default(), ThresholdPolicy::Baseline.thresholds());
    }

    #[test]
    fn test_rejects_unordered_bands() {
        assert_eq!(
            Thresholds::new(0.7, 0.3, None),
            Err(ConfigError::Unordered {
                low: 0.7,
                moderate_high: 0.3
            })
        );
        assert!(matches!(
            Thresholds::new(0.5, 0.5, None),
            Err(ConfigError::Unordered { .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(
            Thresholds::new(0.0, 0.6, None),
            Err(ConfigError::OutOfRange { name: "low", .. })
        ));
        assert!(matches!(
            Thresholds::new(0.3, 1.2, None),
            Err(ConfigError::OutOfRange { name: "moderate_high", .. })
        ));
        assert!(matches!(
            Thresholds::new(0.3, 0.6, Some(-0.1)),
            Err(ConfigError::OutOfRange { name: "cutoff", .. })
        ));
        assert!(matches!(
            Thresholds::new(f64::NAN, 0.6, None),
            Err(ConfigError::NonFinite { name: "low", .. })
        ));
    }

    #[test]
    fn test_moderate_high_may_close_at_one() {
        let t = Thresholds::new(0.3, 1.0, None).expect("valid");
        assert_eq!(t.tier_for(0.999), RiskTier::Moderate);
        assert_eq!(t.tier_for(1.0), RiskTier::High);
    }

    #[test]
    fn test_band_edges() {
        let t = Thresholds::new(0.3, 0.7, Some(0.5)).expect("valid");
        assert_eq!(t.tier_for(0.0), RiskTier::Low);
        assert_eq!(t.tier_for(0.299_999), RiskTier::Low);
        assert_eq!(t.tier_for(0.3), RiskTier::Moderate);
        assert_eq!(t.tier_for(0.699_999), RiskTier::Moderate);
        assert_eq!(t.tier_for(0.7), RiskTier::High);
        assert_eq!(t.tier_for(1.0), RiskTier::High);
    }

    #[test]
    fn test_decision_is_strictly_above_cutoff() {
        let t = Thresholds::new(0.3, 0.7, Some(0.5)).expect("valid");
        assert_eq!(t.decision_for(0.5), Some(Decision::Negative));
        assert_eq!(t.decision_for(0.500_001), Some(Decision::Positive));

        let no_cutoff = t.with_cutoff(None).expect("valid");
        assert_eq!(no_cutoff.decision_for(0.99), None);
    }

    #[test]
    fn test_deserialize_validates() {
        let t: Thresholds =
            serde_json::from_str(r#"{"low":0.3,"moderate_high":0.7,"cutoff":0.5}"#)
                .expect("valid thresholds");
        assert_eq!(t, ThresholdPolicy::Conservative.thresholds());

        let no_cutoff: Thresholds =
            serde_json::from_str(r#"{"low":0.3,"moderate_high":0.6}"#).expect("valid");
        assert_eq!(no_cutoff.cutoff(), None);

        let err = serde_json::from_str::<Thresholds>(r#"{"low":0.8,"moderate_high":0.6}"#)
            .expect_err("unordered must fail");
        assert!(err.to_string().contains("not ordered"));

        assert!(serde_json::from_str::<Thresholds>(
            r#"{"low":0.3,"moderate_high":0.6,"extra":1}"#
        )
        .is_err());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "Conservative".parse::<ThresholdPolicy>(),
            Ok(ThresholdPolicy::Conservative)
        );
        assert_eq!(" sensitive ".parse::<ThresholdPolicy>(), Ok(ThresholdPolicy::Sensitive));
        assert_eq!(
            "strict".parse::<ThresholdPolicy>(),
            Err(ConfigError::UnknownPolicy("strict".into()))
        );
    }
}
