//! Column-name contracts for the `xy_splitter` and `reader` namespaces.
//!
//! Splitter and reader for the same model variant must agree on the column
//! lists, so both are built from the constants below and never spelled out
//! twice.

use serde::{Deserialize, Serialize};

/// Input image path column.
pub const X_COLUMNS: &[&str] = &["file_path_image"];
/// Target mask path column.
pub const Y_COLUMNS: &[&str] = &["file_path_mask"];

/// Input and target field names for one model variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub x_columns: Vec<String>,
    pub y_columns: Vec<String>,
}

impl ColumnConfig {
    fn from_constants(x: &[&str], y: &[&str]) -> Self {
        Self {
            x_columns: x.iter().map(|c| c.to_string()).collect(),
            y_columns: y.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Image/mask columns used by the U-Net variant.
    pub fn unet() -> Self {
        Self::from_constants(X_COLUMNS, Y_COLUMNS)
    }
}

/// Column contracts keyed by model variant.
///
/// Used for both the `xy_splitter` and the `reader` namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelColumns {
    pub unet: ColumnConfig,
}

impl ModelColumns {
    pub fn new() -> Self {
        Self {
            unet: ColumnConfig::unet(),
        }
    }
}

impl Default for ModelColumns {
    fn default() -> Self {
        Self::new()
    }
}
