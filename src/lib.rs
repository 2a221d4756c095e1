//! # Glucorisk
//!
//! Diabetes risk scoring engine.
//!
//! This crate provides:
//! - A fixed-schema patient record builder (eight Pima measurements)
//! - A pluggable probabilistic scorer port with a logistic-regression adapter
//! - Tiered risk classification with configurable bands and an independent
//!   binary decision cutoff
//! - Terminal UI for single-patient assessment
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (PatientRecord, Thresholds, ScoreResult)
//! - `ports`: Trait definitions for the scoring model
//! - `adapters`: Concrete implementations (logistic model, log sanitizing)
//! - `application`: The scoring use case
//! - `config`: Environment-driven configuration
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Assessment, PatientRecord, RiskTier, ScoreResult, Thresholds};

/// Result type for Glucorisk operations
pub type Result<T> = std::result::Result<T, RiskScoreError>;

/// Main error type for Glucorisk
#[derive(Debug, thiserror::Error)]
pub enum RiskScoreError {
    #[error("Invalid patient input: {0}")]
    Schema(#[from] domain::SchemaError),

    #[error("Scoring failed: {0}")]
    Scoring(#[from] domain::ScoringError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] domain::ConfigError),

    #[error("Model could not be loaded: {0}")]
    Model(#[from] adapters::ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
