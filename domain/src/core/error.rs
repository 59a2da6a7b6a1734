//! Configuration error types

use thiserror::Error;

/// Errors raised while resolving flat parameters into a pipeline configuration.
///
/// Every variant names the offending parameter key so the caller can report
/// it before any training or inference resource is allocated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing required parameter '{key}'")]
    MissingParameter { key: String },

    #[error("parameter '{key}' must be {expected}, got {found}")]
    InvalidParameterType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid value for parameter '{key}': {reason}")]
    InvalidParameterValue { key: String, reason: String },
}

impl ConfigError {
    pub fn missing(key: &str) -> Self {
        Self::MissingParameter {
            key: key.to_string(),
        }
    }

    pub fn invalid_type(key: &str, expected: &'static str, found: &'static str) -> Self {
        Self::InvalidParameterType {
            key: key.to_string(),
            expected,
            found,
        }
    }

    pub fn invalid_value(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameterValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// The parameter key this error refers to.
    pub fn key(&self) -> &str {
        match self {
            Self::MissingParameter { key }
            | Self::InvalidParameterType { key, .. }
            | Self::InvalidParameterValue { key, .. } => key,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::MissingParameter { .. })
    }
}
