//! Parameter source port.
//!
//! A [`ParameterSource`] supplies the flat parameter mapping the assembler
//! consumes. Where the values come from (files, environment, an experiment
//! tracker) is the adapter's business.
//!
//! # Built-in Implementations
//!
//! - [`StaticParameterSource`] - Returns a fixed, in-memory mapping
//!
//! The file and environment backed loader lives in the infrastructure layer.

use segpipe_domain::ParameterMap;
use thiserror::Error;

/// Failure to produce a parameter mapping at all.
///
/// Invalid *values* are not reported here; they surface later as
/// [`ConfigError`](segpipe_domain::ConfigError)s during assembly.
#[derive(Error, Debug)]
pub enum ParameterSourceError {
    /// A source exists but could not be read or parsed.
    #[error("failed to load parameters from {origin}: {message}")]
    Load { origin: String, message: String },
}

impl ParameterSourceError {
    pub fn load(origin: impl Into<String>, message: impl ToString) -> Self {
        Self::Load {
            origin: origin.into(),
            message: message.to_string(),
        }
    }
}

/// Port for loading flat pipeline parameters.
pub trait ParameterSource {
    /// Load the complete flat mapping.
    fn load(&self) -> Result<ParameterMap, ParameterSourceError>;

    /// Short description for logs (e.g. file paths consulted).
    fn describe(&self) -> String;
}

/// Parameter source backed by an in-memory mapping.
///
/// Useful for tests and for hosts that already hold parsed parameters.
#[derive(Debug, Clone, Default)]
pub struct StaticParameterSource {
    parameters: ParameterMap,
}

impl StaticParameterSource {
    pub fn new(parameters: ParameterMap) -> Self {
        Self { parameters }
    }
}

impl ParameterSource for StaticParameterSource {
    fn load(&self) -> Result<ParameterMap, ParameterSourceError> {
        Ok(self.parameters.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory ({} parameters)", self.parameters.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source_returns_mapping() {
        let params = ParameterMap::new().with("lr", 0.001);
        let source = StaticParameterSource::new(params.clone());
        assert_eq!(source.load().unwrap(), params);
        assert_eq!(source.describe(), "in-memory (1 parameters)");
    }

    #[test]
    fn test_load_error_display() {
        let err = ParameterSourceError::load("pipeline.toml", "expected a table");
        assert_eq!(
            err.to_string(),
            "failed to load parameters from pipeline.toml: expected a table"
        );
    }
}
