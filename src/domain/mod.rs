//! Domain layer: Core types and decision logic.
//!
//! Pure Rust types with no I/O. Everything here is deterministic.

mod assessment;
mod patient;
mod thresholds;

pub use assessment::{Assessment, Decision, RiskTier, ScoreResult, ScoringError};
pub use patient::{
    check_feature_names, field_spec, FieldKind, FieldSpec, PatientRecord, PatientRecordBuilder,
    SchemaError, FEATURE_COUNT, FEATURE_NAMES, FIELD_SPECS,
};
pub use thresholds::{ConfigError, ThresholdPolicy, Thresholds};
