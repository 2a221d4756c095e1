//! Scorer port: Trait for probabilistic risk models.
//!
//! This trait abstracts the underlying classifier from the decision logic.

use crate::domain::{PatientRecord, ScoringError};

/// A model that estimates the probability of a positive outcome.
///
/// Implementations may be logistic regression, gradient boosting, a remote
/// service, or a test fake. The decision engine never inspects the model
/// itself; it only relies on this contract:
///
/// - one call per prediction, no retries
/// - the returned value is a probability in `[0, 1]`; anything else is
///   rejected by the caller as `ScoringError::InvalidProbability`
///
/// Plain closures `Fn(&PatientRecord) -> Result<f64, ScoringError>` implement
/// this trait, which makes fakes trivial to write.
pub trait RiskScorer {
    /// Estimate `P(outcome = 1 | record)`.
    ///
    /// # Errors
    /// Returns `ScoringError` if the model cannot evaluate the record.
    fn predict_proba(&self, record: &PatientRecord) -> Result<f64, ScoringError>;

    /// Short identifier for logs and display.
    fn describe(&self) -> String {
        "opaque scorer".to_string()
    }
}

impl<F> RiskScorer for F
where
    F: Fn(&PatientRecord) -> Result<f64, ScoringError>,
{
    fn predict_proba(&self, record: &PatientRecord) -> Result<f64, ScoringError> {
        self(record)
    }
}
