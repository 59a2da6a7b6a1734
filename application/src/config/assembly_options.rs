//! Host-level control over a single assembly run.
//!
//! [`AssemblyOptions`] carries what the host knows that the parameter
//! source does not, such as an explicit experiment root or overrides typed
//! on the command line.

use segpipe_domain::{ParamValue, ParameterMap, Severity};
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct AssemblyOptions {
    /// Experiment root; when `None` the `experiment_dir` parameter is used.
    pub experiment_root: Option<PathBuf>,
    /// Applied on top of whatever the parameter source returns.
    pub overrides: ParameterMap,
    /// Treat unrecognized parameter keys as fatal.
    pub strict: bool,
}

impl AssemblyOptions {
    // ==================== Builder Methods ====================

    pub fn with_experiment_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.experiment_root = Some(root.into());
        self
    }

    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.overrides.insert(key, value);
        self
    }

    pub fn with_overrides(mut self, overrides: ParameterMap) -> Self {
        self.overrides.merge(overrides);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Severity given to unrecognized keys under these options.
    pub fn unrecognized_key_severity(&self) -> Severity {
        if self.strict {
            Severity::Error
        } else {
            Severity::Warning
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let options = AssemblyOptions::default();
        assert!(options.experiment_root.is_none());
        assert!(options.overrides.is_empty());
        assert!(!options.strict);
        assert_eq!(options.unrecognized_key_severity(), Severity::Warning);
    }

    #[test]
    fn test_builder() {
        let options = AssemblyOptions::default()
            .with_experiment_root("/tmp/exp")
            .with_override("batch_size_train", 8)
            .with_overrides(ParameterMap::new().with("lr", 0.01))
            .with_strict(true);

        assert_eq!(options.experiment_root, Some(PathBuf::from("/tmp/exp")));
        assert_eq!(options.overrides.len(), 2);
        assert_eq!(options.unrecognized_key_severity(), Severity::Error);
    }
}
