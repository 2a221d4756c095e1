//! Logistic adapter: Implementation of RiskScorer for a scaled logistic regression.
//!
//! The model artifact is the JSON export of a standard-scaler + logistic
//! regression pipeline:
//!
//! ```json
//! {
//!   "model_version": "pima-lr-1",
//!   "feature_names": ["Pregnancies", "Glucose", ...],
//!   "coefficients": [...],
//!   "intercept": -0.86,
//!   "scaler_mean": [...],
//!   "scaler_scale": [...]
//! }
//! ```
//!
//! `feature_names` must equal the canonical record order exactly. A model
//! trained on a different column order is rejected at load time instead of
//! silently mispredicting.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{check_feature_names, PatientRecord, SchemaError, ScoringError};
use crate::ports::RiskScorer;

/// Error type for model artifact loading.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read model file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model schema mismatch: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid model parameters: {0}")]
    InvalidParameters(String),
}

/// Model parameters exported by the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedLogisticModel {
    #[serde(default)]
    pub model_version: Option<String>,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub scaler_mean: Vec<f64>,
    pub scaler_scale: Vec<f64>,
}

/// Loaded, validated logistic regression model.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    params: ExportedLogisticModel,
    fingerprint: String,
}

impl LogisticModel {
    /// Load a model from a JSON file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or the model is invalid.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json_slice(&bytes)?;

        tracing::info!(
            "Loaded model from {:?} (version={}, fingerprint={}, n_features={})",
            path,
            model.version(),
            model.fingerprint,
            model.params.feature_names.len()
        );

        Ok(model)
    }

    /// Parse and validate a model from JSON bytes.
    ///
    /// # Errors
    /// Returns error if the JSON is malformed or the parameters are invalid.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let params: ExportedLogisticModel = serde_json::from_slice(bytes)?;
        Self::validate(&params)?;
        Ok(Self {
            params,
            fingerprint: compute_fingerprint(bytes),
        })
    }

    /// Build a model directly from parameters.
    ///
    /// The fingerprint is computed over the canonical JSON serialization.
    ///
    /// # Errors
    /// Returns error if the parameters are invalid.
    pub fn from_parameters(params: ExportedLogisticModel) -> Result<Self, ModelError> {
        Self::validate(&params)?;
        let bytes = serde_json::to_vec(&params)?;
        Ok(Self {
            fingerprint: compute_fingerprint(&bytes),
            params,
        })
    }

    fn validate(params: &ExportedLogisticModel) -> Result<(), ModelError> {
        check_feature_names(params.feature_names.as_slice())?;

        let n = params.feature_names.len();
        if params.coefficients.len() != n
            || params.scaler_mean.len() != n
            || params.scaler_scale.len() != n
        {
            return Err(ModelError::InvalidParameters(
                "Model parameter lengths do not match feature_names length".into(),
            ));
        }

        let all_finite = params
            .coefficients
            .iter()
            .chain(&params.scaler_mean)
            .chain(&params.scaler_scale)
            .chain(std::iter::once(&params.intercept))
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ModelError::InvalidParameters(
                "Model parameters must be finite".into(),
            ));
        }

        if let Some(i) = params.scaler_scale.iter().position(|s| *s == 0.0) {
            return Err(ModelError::InvalidParameters(format!(
                "scaler_scale for {} is zero",
                params.feature_names[i]
            )));
        }

        Ok(())
    }

    /// Short SHA-256 fingerprint of the model artifact.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    #[must_use]
    pub fn version(&self) -> &str {
        self.params.model_version.as_deref().unwrap_or("unversioned")
    }

    #[must_use]
    pub fn parameters(&self) -> &ExportedLogisticModel {
        &self.params
    }

    /// Linear predictor (log-odds) for a record.
    #[must_use]
    pub fn decision_function(&self, record: &PatientRecord) -> f64 {
        let p = &self.params;
        record
            .to_vec()
            .iter()
            .enumerate()
            .fold(p.intercept, |acc, (i, x)| {
                acc + p.coefficients[i] * (x - p.scaler_mean[i]) / p.scaler_scale[i]
            })
    }
}

impl RiskScorer for LogisticModel {
    fn predict_proba(&self, record: &PatientRecord) -> Result<f64, ScoringError> {
        let z = self.decision_function(record);
        if !z.is_finite() {
            return Err(ScoringError::Model(format!(
                "Linear predictor is not finite ({z})"
            )));
        }
        Ok(sigmoid(z))
    }

    fn describe(&self) -> String {
        format!("logistic {} [{}]", self.version(), self.fingerprint)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn compute_fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);

    // First 8 bytes (64 bits) are enough to tell artifacts apart in logs.
    digest[..8].iter().map(|b| format!("{b:02x}")).collect()
}
