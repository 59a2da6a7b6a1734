//! Output format value object

use serde::{Deserialize, Serialize};

/// How an assembled pipeline configuration is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// TOML document
    Toml,
    /// Short human-readable overview
    Summary,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Json
    }
}
