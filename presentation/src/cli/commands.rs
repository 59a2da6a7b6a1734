//! CLI command definitions

use clap::{Parser, ValueEnum};
use segpipe_domain::{ParamValue, ParameterMap};
use std::path::PathBuf;

/// Output format for the assembled configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// TOML document
    Toml,
    /// Short human-readable overview
    Summary,
}

impl From<OutputFormat> for segpipe_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json,
            OutputFormat::Toml => Self::Toml,
            OutputFormat::Summary => Self::Summary,
        }
    }
}

/// CLI arguments for segpipe
#[derive(Parser, Debug)]
#[command(name = "segpipe")]
#[command(author, version, about = "Assemble a U-Net segmentation pipeline configuration")]
#[command(long_about = r#"
segpipe resolves flat pipeline parameters into the nested configuration
consumed by every stage of a U-Net segmentation pipeline (loading, training,
test-time augmentation, post-processing) and prints it.

Parameters are merged from (in priority order):
1. --set KEY=VALUE                          Command-line overrides
2. SEGPIPE_PARAMETERS__<KEY>                Environment variables
3. --config <path>                          Explicit parameter file
4. ./pipeline.toml                          Project-level file
5. ~/.config/segpipe/parameters.toml        Global file

Override values are typed as bool, integer, float or string; wrap a value
in double quotes to keep it a string (environment variables follow the
same rule).

Example:
  segpipe --experiment-dir /data/exp/salt
  segpipe --config run.toml --set image_h=256 --set lr=0.0005 --output toml
  segpipe --strict --output summary
"#)]
pub struct Cli {
    /// Path to parameter file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of parameter files
    #[arg(long)]
    pub no_config: bool,

    /// Experiment root directory (overrides the experiment_dir parameter)
    #[arg(short = 'e', long, value_name = "DIR")]
    pub experiment_dir: Option<PathBuf>,

    /// Override a parameter (can be specified multiple times)
    ///
    /// VALUE is typed as bool, integer, float or string. Wrap it in double
    /// quotes to force a string, e.g. --set 'encoder="34"'.
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(String, ParamValue)>,

    /// Output format (defaults to the parameter file's [output] format, then json)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Treat unrecognized parameters as errors
    #[arg(long)]
    pub strict: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Show parameter file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// `--set` values as a parameter mapping; later flags win.
    pub fn override_map(&self) -> ParameterMap {
        self.overrides.iter().cloned().collect()
    }
}

/// Parse `KEY=VALUE`, typing the value as bool, integer, float or string.
/// A double-quoted value is always a string.
pub fn parse_override(raw: &str) -> Result<(String, ParamValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty parameter name in '{}'", raw));
    }
    Ok((key.to_string(), ParamValue::parse_literal(value.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override_types() {
        assert_eq!(
            parse_override("image_h=256").unwrap(),
            ("image_h".to_string(), ParamValue::Int(256))
        );
        assert_eq!(
            parse_override("lr=0.0005").unwrap().1,
            ParamValue::Float(0.0005)
        );
        assert_eq!(
            parse_override("pin_memory=false").unwrap().1,
            ParamValue::Bool(false)
        );
        assert_eq!(
            parse_override("encoder=ResNet34").unwrap().1,
            ParamValue::Str("ResNet34".to_string())
        );
    }

    #[test]
    fn test_parse_override_quoted_value_is_string() {
        assert_eq!(
            parse_override("encoder=\"34\"").unwrap(),
            ("encoder".to_string(), ParamValue::Str("34".to_string()))
        );
        assert_eq!(
            parse_override("train_images_dir=\"2024\"").unwrap().1,
            ParamValue::Str("2024".to_string())
        );
    }

    #[test]
    fn test_parse_override_keeps_equals_in_value() {
        let (key, value) = parse_override("validation_metric_name=a=b").unwrap();
        assert_eq!(key, "validation_metric_name");
        assert_eq!(value, ParamValue::Str("a=b".to_string()));
    }

    #[test]
    fn test_parse_override_rejects_malformed() {
        assert!(parse_override("image_h").is_err());
        assert!(parse_override("=256").is_err());
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "segpipe",
            "--experiment-dir",
            "/data/exp",
            "--set",
            "image_h=256",
            "--set",
            "image_h=320",
            "--output",
            "toml",
            "--strict",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.experiment_dir, Some(PathBuf::from("/data/exp")));
        assert_eq!(cli.output, Some(OutputFormat::Toml));
        assert!(cli.strict);
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.override_map().get("image_h"),
            Some(&ParamValue::Int(320))
        );
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["segpipe"]).unwrap();
        assert!(cli.config.is_none());
        assert!(!cli.no_config);
        assert!(cli.output.is_none());
        assert!(cli.overrides.is_empty());
    }

    #[test]
    fn test_cli_rejects_bad_override() {
        assert!(Cli::try_parse_from(["segpipe", "--set", "image_h"]).is_err());
    }

    #[test]
    fn test_output_format_maps_to_domain() {
        assert_eq!(
            segpipe_domain::OutputFormat::from(OutputFormat::Summary),
            segpipe_domain::OutputFormat::Summary
        );
    }
}
