//! Runtime configuration from environment variables.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `RISKSCORE_MODEL_PATH` | model artifact (JSON) | `models/diabetes_model.json` |
//! | `RISKSCORE_THRESHOLD_POLICY` | `baseline`, `conservative` or `sensitive` | `baseline` |
//! | `RISKSCORE_THRESHOLDS_FILE` | JSON thresholds, replaces the policy | unset |
//! | `RISKSCORE_LOW_THRESHOLD` | Low/Moderate boundary | from policy |
//! | `RISKSCORE_MODERATE_HIGH_THRESHOLD` | Moderate/High boundary | from policy |
//! | `RISKSCORE_DECISION_CUTOFF` | binary cutoff, or `none` | from policy |
//!
//! Individual overrides apply on top of the policy (or file). The final set
//! is validated once; an invalid combination fails startup.

use std::path::{Path, PathBuf};

use crate::domain::{ConfigError, ThresholdPolicy, Thresholds};

pub const MODEL_PATH_ENV: &str = "RISKSCORE_MODEL_PATH";
pub const POLICY_ENV: &str = "RISKSCORE_THRESHOLD_POLICY";
pub const THRESHOLDS_FILE_ENV: &str = "RISKSCORE_THRESHOLDS_FILE";
pub const LOW_ENV: &str = "RISKSCORE_LOW_THRESHOLD";
pub const MODERATE_HIGH_ENV: &str = "RISKSCORE_MODERATE_HIGH_THRESHOLD";
pub const CUTOFF_ENV: &str = "RISKSCORE_DECISION_CUTOFF";

const DEFAULT_MODEL_PATH: &str = "models/diabetes_model.json";

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub thresholds: Thresholds,
    /// Where the thresholds came from, for display.
    pub threshold_source: String,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError` if any threshold setting is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `ConfigError` if any threshold setting is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let model_path = get(MODEL_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

        let (base, mut source) = match get(THRESHOLDS_FILE_ENV) {
            Some(path) => (load_thresholds_file(Path::new(&path))?, format!("file {path}")),
            None => {
                let policy = match get(POLICY_ENV) {
                    Some(name) => name.parse::<ThresholdPolicy>()?,
                    None => ThresholdPolicy::default(),
                };
                (policy.thresholds(), format!("policy {policy}"))
            }
        };

        let low = match get(LOW_ENV) {
            Some(v) => parse_probability(LOW_ENV, &v)?,
            None => base.low(),
        };
        let moderate_high = match get(MODERATE_HIGH_ENV) {
            Some(v) => parse_probability(MODERATE_HIGH_ENV, &v)?,
            None => base.moderate_high(),
        };
        let cutoff = match get(CUTOFF_ENV) {
            Some(v) if v.trim().eq_ignore_ascii_case("none") => None,
            Some(v) => Some(parse_probability(CUTOFF_ENV, &v)?),
            None => base.cutoff(),
        };

        let thresholds = Thresholds::new(low, moderate_high, cutoff)?;
        if thresholds != base {
            source.push_str(" (overridden)");
        }

        tracing::info!(
            "Configuration loaded: model={:?}, thresholds from {}",
            model_path,
            source
        );

        Ok(Self {
            model_path,
            thresholds,
            threshold_source: source,
        })
    }
}

fn parse_probability(key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// Read a thresholds JSON file (`{"low":..,"moderate_high":..,"cutoff":..}`).
///
/// # Errors
/// Returns `ConfigError::Read` if the file is unreadable or malformed, or the
/// validation error if the values do not form valid bands.
pub fn load_thresholds_file(path: &Path) -> Result<Thresholds, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).expect("defaults are valid");
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(config.thresholds, ThresholdPolicy::Baseline.thresholds());
        assert_eq!(config.threshold_source, "policy baseline");
    }

    #[test]
    fn test_named_policy() {
        let config = config_from(&[(POLICY_ENV, "sensitive")]).expect("valid");
        assert_eq!(config.thresholds, ThresholdPolicy::Sensitive.thresholds());

        let err = config_from(&[(POLICY_ENV, "aggressive")]).expect_err("unknown policy");
        assert!(matches!(err, ConfigError::UnknownPolicy(_)));
    }

    #[test]
    fn test_individual_overrides() {
        let config = config_from(&[
            (POLICY_ENV, "baseline"),
            (MODERATE_HIGH_ENV, "0.7"),
            (CUTOFF_ENV, "none"),
        ])
        .expect("valid");

        assert!((config.thresholds.low() - 0.3).abs() < f64::EPSILON);
        assert!((config.thresholds.moderate_high() - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.thresholds.cutoff(), None);
        assert!(config.threshold_source.ends_with("(overridden)"));
    }

    #[test]
    fn test_invalid_overrides_fail() {
        let err = config_from(&[(LOW_ENV, "0.8")]).expect_err("low above moderate_high");
        assert!(matches!(err, ConfigError::Unordered { .. }));

        let err = config_from(&[(CUTOFF_ENV, "half")]).expect_err("not a number");
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: CUTOFF_ENV.into(),
                value: "half".into()
            }
        );
    }

    #[test]
    fn test_thresholds_file() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("thresholds.json");
        std::fs::write(&path, r#"{"low": 0.25, "moderate_high": 0.65, "cutoff": 0.4}"#)
            .expect("write thresholds");
        let path_str = path.display().to_string();

        let config = config_from(&[(THRESHOLDS_FILE_ENV, &path_str), (POLICY_ENV, "sensitive")])
            .expect("valid");
        assert_eq!(
            config.thresholds,
            Thresholds::new(0.25, 0.65, Some(0.4)).expect("valid")
        );
        assert!(config.threshold_source.starts_with("file "));
    }

    #[test]
    fn test_bad_thresholds_file() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("thresholds.json");
        std::fs::write(&path, r#"{"low": 0.9, "moderate_high": 0.6}"#).expect("write");

        let err = load_thresholds_file(&path).expect_err("unordered bands");
        assert!(matches!(err, ConfigError::Read { .. }));

        let missing = load_thresholds_file(&temp.path().join("absent.json"))
            .expect_err("missing file");
        assert!(matches!(missing, ConfigError::Read { .. }));
    }
}
