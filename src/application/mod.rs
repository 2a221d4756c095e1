//! Application layer: Use cases.
//!
//! Orchestrates domain logic with the scorer port to implement the single
//! use case of the application: scoring one patient record.

mod classifier;

pub use classifier::{score, RiskClassifier};
