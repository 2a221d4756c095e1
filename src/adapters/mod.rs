//! Adapters layer: Concrete implementations of ports.
//!
//! - `logistic`: scaled logistic regression loaded from a JSON artifact
//! - `sanitize`: patient-data filtering for logs

pub mod logistic;
pub mod sanitize;

pub use logistic::{LogisticModel, ModelError};
