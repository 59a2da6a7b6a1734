//! Assemble pipeline use case
//!
//! Wires a [`ParameterSource`] to the domain assembler:
//!
//! 1. **Load** - Ask the source for the flat parameter mapping
//! 2. **Override** - Apply host overrides on top
//! 3. **Resolve root** - Explicit root, else the `experiment_dir` parameter
//! 4. **Check keys** - Report parameters no stage consumes
//! 5. **Assemble** - Build the [`PipelineConfig`]
//!
//! Runs synchronously and performs no I/O of its own; whatever the source
//! does is the only I/O.

use crate::config::AssemblyOptions;
use crate::ports::parameter_source::{ParameterSource, ParameterSourceError};
use segpipe_domain::parameters::EXPERIMENT_DIR;
use segpipe_domain::parameters::validation::{find_unrecognized_keys, has_errors};
use segpipe_domain::{
    ConfigError, ConfigIssue, ConfigIssueCode, ParameterMap, PipelineConfig, Severity, assemble,
};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort pipeline assembly.
#[derive(Error, Debug)]
pub enum AssemblePipelineError {
    /// The parameter source could not produce a mapping.
    #[error(transparent)]
    Source(#[from] ParameterSourceError),

    /// A parameter is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Strict mode and the mapping contains keys no stage reads.
    #[error("unrecognized parameters: {}", keys.join(", "))]
    UnrecognizedParameters { keys: Vec<String> },
}

impl AssemblePipelineError {
    /// Offending parameter key, when the failure is about a single key.
    pub fn key(&self) -> Option<&str> {
        match self {
            AssemblePipelineError::Config(e) => Some(e.key()),
            _ => None,
        }
    }
}

/// Result of a successful assembly.
#[derive(Debug, Clone)]
pub struct AssemblePipelineOutput {
    pub config: PipelineConfig,
    /// Non-fatal findings (e.g. unrecognized keys in lenient mode).
    pub issues: Vec<ConfigIssue>,
    /// The effective flat parameters after overrides.
    pub parameters: ParameterMap,
}

/// Use case for resolving a pipeline configuration from a parameter source.
pub struct AssemblePipelineUseCase<S: ParameterSource> {
    source: S,
}

impl<S: ParameterSource> AssemblePipelineUseCase<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn execute(
        &self,
        options: &AssemblyOptions,
    ) -> Result<AssemblePipelineOutput, AssemblePipelineError> {
        info!("Loading pipeline parameters from {}", self.source.describe());
        let mut parameters = self.source.load()?;
        debug!(
            "Loaded {} parameters, applying {} overrides",
            parameters.len(),
            options.overrides.len()
        );
        parameters.merge(options.overrides.clone());

        let experiment_root = Self::resolve_experiment_root(&parameters, options)?;

        let issues = find_unrecognized_keys(&parameters, options.unrecognized_key_severity());
        // Surfaced to the user by the caller.
        for issue in &issues {
            debug!("{}", issue.message);
        }
        if has_errors(&issues) {
            let keys = issues
                .iter()
                .filter(|i| i.severity == Severity::Error)
                .map(|i| match &i.code {
                    ConfigIssueCode::UnrecognizedKey { key } => key.clone(),
                })
                .collect();
            return Err(AssemblePipelineError::UnrecognizedParameters { keys });
        }

        let config = assemble(&parameters, &experiment_root)?;
        info!(
            "Assembled pipeline configuration (experiment root: {}, checkpoint: {})",
            experiment_root.display(),
            config.checkpoint_path().display()
        );

        Ok(AssemblePipelineOutput {
            config,
            issues,
            parameters,
        })
    }

    /// Explicit root wins; otherwise `experiment_dir` must be present.
    fn resolve_experiment_root(
        parameters: &ParameterMap,
        options: &AssemblyOptions,
    ) -> Result<PathBuf, ConfigError> {
        match &options.experiment_root {
            Some(root) => Ok(root.clone()),
            None => parameters.string(EXPERIMENT_DIR).map(PathBuf::from),
        }
    }
}
