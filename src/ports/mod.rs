//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the decision engine and the model that feeds it.

mod scorer;

pub use scorer::RiskScorer;
