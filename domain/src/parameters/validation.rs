//! Non-fatal findings about a parameter mapping.
//!
//! Hard failures are [`ConfigError`](crate::ConfigError)s and abort assembly.
//! Everything else (keys nobody reads, for instance) is reported as a
//! [`ConfigIssue`] so the host can decide whether to warn or refuse.

use super::keys::lookup_key;
use super::map::ParameterMap;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the run must not start.
    Error,
    /// Non-fatal: the run can start but the input is suspicious.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// The parameter source supplied a key no pipeline stage consumes.
    UnrecognizedKey { key: String },
}

/// A detected issue in the parameter mapping.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

/// Report keys that are not in the registry.
///
/// `severity` is applied to every finding; strict hosts pass
/// [`Severity::Error`].
pub fn find_unrecognized_keys(params: &ParameterMap, severity: Severity) -> Vec<ConfigIssue> {
    params
        .keys()
        .filter(|key| lookup_key(key).is_none())
        .map(|key| ConfigIssue {
            severity,
            code: ConfigIssueCode::UnrecognizedKey {
                key: key.to_string(),
            },
            message: format!("parameter '{}' is not used by any pipeline stage", key),
        })
        .collect()
}

/// Check whether any issues are errors (i.e. fatal).
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}
