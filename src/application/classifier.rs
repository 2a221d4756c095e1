//! Risk classifier: scores a record and interprets the probability.
//!
//! The scorer is an explicitly passed, read-only handle. Nothing is cached
//! between calls, so identical inputs always give identical results.

use std::sync::Arc;

use crate::domain::{Assessment, PatientRecord, ScoreResult, ScoringError, Thresholds};
use crate::ports::RiskScorer;
use crate::RiskScoreError;

/// Score one record: a single scorer call, then tier/decision mapping.
///
/// # Errors
/// Returns `ScoringError` if the scorer fails or returns a value outside `[0, 1]`.
/// No partial result is produced.
pub fn score<S>(
    record: &PatientRecord,
    scorer: &S,
    thresholds: &Thresholds,
) -> Result<ScoreResult, ScoringError>
where
    S: RiskScorer + ?Sized,
{
    let probability = scorer.predict_proba(record)?;
    ScoreResult::classify(probability, thresholds)
}

/// Classifier bound to a loaded model and a validated threshold set.
pub struct RiskClassifier<S>
where
    S: RiskScorer,
{
    scorer: Arc<S>,
    thresholds: Thresholds,
}

impl<S> RiskClassifier<S>
where
    S: RiskScorer,
{
    /// Create a new classifier.
    pub fn new(scorer: Arc<S>, thresholds: Thresholds) -> Self {
        tracing::info!(
            "Risk classifier ready: scorer={}, low={}, moderate_high={}, cutoff={:?}",
            scorer.describe(),
            thresholds.low(),
            thresholds.moderate_high(),
            thresholds.cutoff()
        );
        Self { scorer, thresholds }
    }

    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    #[must_use]
    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Score a record.
    ///
    /// # Errors
    /// See [`score`].
    pub fn score(&self, record: &PatientRecord) -> Result<ScoreResult, ScoringError> {
        score(record, self.scorer.as_ref(), &self.thresholds)
    }

    /// Score a record and wrap it with its echo and timestamp.
    ///
    /// # Errors
    /// Returns `RiskScoreError::Scoring` if scoring fails.
    pub fn assess(&self, record: PatientRecord) -> Result<Assessment, RiskScoreError> {
        tracing::debug!("Scoring patient record...");

        let result = match self.score(&record) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Scoring failed: {}", e);
                return Err(e.into());
            }
        };

        tracing::info!(
            "Assessment complete: probability={:.4}, tier={}, decision={}",
            result.probability(),
            result.tier(),
            result
                .decision()
                .map_or_else(|| "n/a".to_string(), |d| d.as_u8().to_string())
        );

        Ok(Assessment::new(record, result))
    }
}
