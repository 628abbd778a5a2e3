//! Error types for construction-time failures.
//!
//! Stepping never fails: degenerate geometry resolves to a zero vector
//! inside the force math. Only building a simulation can go wrong.

use thiserror::Error;

/// An invalid configuration value, reported by field name.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must lie in [0, 1), got {value}")]
    ThresholdOutOfRange { field: &'static str, value: f64 },
    #[error("soft boundary {soft} must be below hard boundary {hard}")]
    BoundaryOrder { soft: f64, hard: f64 },
    #[error("invalid configuration document: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Errors raised while building a [`crate::Simulation`].
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to gather entropy for the spawn seed: {0}")]
    Entropy(String),
    #[error("agent {index} has a non-finite position or velocity")]
    NonFiniteAgent { index: usize },
}
