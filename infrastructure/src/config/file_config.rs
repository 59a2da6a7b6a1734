//! Raw TOML parameter file data types
//!
//! These structs mirror the on-disk layout of a parameter file:
//!
//! ```toml
//! [parameters]
//! experiment_dir = "/data/experiments/salt"
//! image_h = 256
//! loader_mode = "resize_and_pad"
//!
//! [output]
//! format = "summary"
//! ```

use segpipe_domain::{OutputFormat, ParameterMap};
use serde::{Deserialize, Serialize};

/// Raw output preferences from TOML (`[output]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Rendering format; the CLI flag wins when given
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// Complete parameter file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParameters {
    /// Flat pipeline parameters, passed to the assembler untouched
    pub parameters: ParameterMap,
    pub output: FileOutputConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use segpipe_domain::ParamValue;

    #[test]
    fn test_deserialize_full_file() {
        let toml_str = r#"
[parameters]
experiment_dir = "/data/exp"
image_h = 256
lr = 0.0001
pin_memory = true

[output]
format = "toml"
color = false
"#;
        let file: FileParameters = toml::from_str(toml_str).unwrap();
        assert_eq!(file.parameters.len(), 4);
        assert_eq!(file.parameters.get("image_h"), Some(&ParamValue::Int(256)));
        assert_eq!(file.parameters.get("lr"), Some(&ParamValue::Float(0.0001)));
        assert_eq!(file.parameters.get("pin_memory"), Some(&ParamValue::Bool(true)));
        assert_eq!(file.output.format, Some(OutputFormat::Toml));
        assert!(!file.output.color);
    }

    #[test]
    fn test_deserialize_parameters_only() {
        let toml_str = r#"
[parameters]
encoder = "ResNet34"
"#;
        let file: FileParameters = toml::from_str(toml_str).unwrap();
        assert_eq!(file.parameters.string("encoder").unwrap(), "ResNet34");
        // Defaults should apply
        assert!(file.output.format.is_none());
        assert!(file.output.color);
    }

    #[test]
    fn test_default_file_is_empty() {
        let file = FileParameters::default();
        assert!(file.parameters.is_empty());
        assert!(file.output.format.is_none());
    }
}
