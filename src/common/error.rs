//! Configuration errors.
//!
//! Everything here is raised while building the app or spawning a round, never mid-tick.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("perception needs at least 2 rays to derive a fan, got {0}")]
    TooFewRays(u32),

    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be zero or positive and finite, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("patrol route has no waypoints")]
    EmptyPatrolRoute,

    #[error("ultimate attack probability must be within 0..=100, got {0}")]
    ProbabilityOutOfRange(u32),

    #[error("spell pool needs at least one slot")]
    EmptySpellPool,

    #[error("tunables json: {0}")]
    Json(String),

    #[error("reading tunables: {0}")]
    Io(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// `value > 0` and finite.
pub fn ensure_positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

/// `value >= 0` and finite.
pub fn ensure_non_negative(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
