//! Output formatter trait

use segpipe_domain::{ConfigIssue, OutputFormat, PipelineConfig};
use thiserror::Error;

/// Serialization failure while rendering a configuration
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render TOML: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Trait for formatting assembled pipeline configurations
pub trait OutputFormatter {
    /// Format as pretty-printed JSON
    fn format_json(&self, config: &PipelineConfig) -> Result<String, RenderError>;

    /// Format as a TOML document
    fn format_toml(&self, config: &PipelineConfig) -> Result<String, RenderError>;

    /// Format a concise human-readable overview
    fn format_summary(&self, config: &PipelineConfig) -> String;

    /// Format non-fatal findings, one per line
    fn format_issues(&self, issues: &[ConfigIssue]) -> String;

    /// Dispatch on `format`
    fn render(
        &self,
        config: &PipelineConfig,
        format: OutputFormat,
    ) -> Result<String, RenderError> {
        match format {
            OutputFormat::Json => self.format_json(config),
            OutputFormat::Toml => self.format_toml(config),
            OutputFormat::Summary => Ok(self.format_summary(config)),
        }
    }
}
