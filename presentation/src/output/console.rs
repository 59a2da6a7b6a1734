//! Console output formatter for pipeline configurations

use crate::output::formatter::{OutputFormatter, RenderError};
use colored::Colorize;
use segpipe_domain::parameters::{ParameterKeyInfo, Requirement};
use segpipe_domain::{ConfigIssue, PipelineConfig, Severity};

/// Formats pipeline configurations for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format as JSON
    pub fn format_json(config: &PipelineConfig) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(config)?)
    }

    /// Format as TOML
    pub fn format_toml(config: &PipelineConfig) -> Result<String, RenderError> {
        Ok(toml::to_string_pretty(config)?)
    }

    /// Format the overview: the values someone checks before launching a run
    pub fn format_summary(config: &PipelineConfig) -> String {
        let mut output = String::new();
        let unet = &config.model.unet;
        let model = &unet.architecture_config.model_params;
        let callbacks = &unet.callbacks_config;
        let dataset = &config.loader.dataset_params;

        output.push_str(&Self::header("Pipeline Configuration"));
        output.push('\n');

        output.push_str(&Self::field(
            "Experiment root:",
            &config.execution.exp_root.display().to_string(),
        ));
        output.push_str(&Self::field(
            "Checkpoint:",
            &config.checkpoint_path().display().to_string(),
        ));

        output.push_str(&Self::section_header("Data"));
        let (h, w) = config.execution.img_hw;
        output.push_str(&Self::field("Image size:", &format!("{}x{}", h, w)));
        output.push_str(&Self::field(
            "Loader:",
            &format!(
                "{} (pad {}, source {}, targets {})",
                config.execution.loader_mode,
                dataset.pad_method,
                dataset.image_source,
                dataset.target_format
            ),
        ));
        output.push_str(&Self::field(
            "Batch size:",
            &format!(
                "train {}, inference {}",
                config.execution.batch_size_train, config.execution.batch_size_inference
            ),
        ));
        output.push_str(&Self::field(
            "Workers:",
            &config.execution.num_workers.to_string(),
        ));

        output.push_str(&Self::section_header("Model"));
        output.push_str(&Self::field(
            "Architecture:",
            &format!(
                "U-Net, {} encoder, {} filters, {} activation",
                model.encoder, model.n_filters, model.activation
            ),
        ));
        output.push_str(&Self::field(
            "Channels:",
            &format!(
                "{} in, {} out, {} outputs",
                model.in_channels, model.out_channels, model.nr_outputs
            ),
        ));
        output.push_str(&Self::field(
            "Training:",
            &format!(
                "{} epochs, lr {}, weight decay {}",
                unet.training_config.epochs,
                unet.architecture_config.optimizer_params.lr,
                unet.architecture_config.regularizer_params.weight_decay_conv2d
            ),
        ));
        let direction = if callbacks.early_stopping.minimize {
            "minimize"
        } else {
            "maximize"
        };
        output.push_str(&Self::field(
            "Validation:",
            &format!(
                "{} {} (patience {}, lr gamma {})",
                direction,
                callbacks.early_stopping.metric_name,
                callbacks.early_stopping.patience,
                callbacks.lr_scheduler.gamma
            ),
        ));

        output.push_str(&Self::section_header("Test-time augmentation"));
        let tta = &config.tta_generator;
        let toggles: Vec<&str> = [
            (tta.flip_ud, "flip_ud"),
            (tta.flip_lr, "flip_lr"),
            (tta.rotation, "rotation"),
            (tta.color_shift_runs, "color_shift"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect();
        let toggles = if toggles.is_empty() {
            "none".to_string()
        } else {
            toggles.join(", ")
        };
        output.push_str(&Self::field(
            "Augmentations:",
            &format!("{} ({} passes)", toggles, tta.variant_count()),
        ));
        output.push_str(&Self::field(
            "Aggregation:",
            &format!(
                "{} on {} threads",
                config.tta_aggregator.method, config.tta_aggregator.nthreads
            ),
        ));

        output.push_str(&Self::section_header("Post-processing"));
        let thresholder = &config.thresholder;
        output.push_str(&Self::field(
            "Thresholds:",
            &format!(
                "masks {}, seeds {}, borders {}",
                Self::gated(thresholder.threshold_masks, thresholder.apply_threshold_masks),
                Self::gated(thresholder.threshold_seeds, thresholder.apply_threshold_seeds),
                Self::gated(
                    thresholder.threshold_borders,
                    thresholder.apply_threshold_borders
                ),
            ),
        ));
        output.push_str(&Self::field(
            "Min sizes:",
            &format!(
                "mask {} px, seed {} px",
                config.dropper.min_mask_size, config.dropper.min_seed_size
            ),
        ));
        for (activation, channels) in &config.postprocessor.channels {
            output.push_str(&Self::field(
                "Channels:",
                &format!("{} -> {}", activation, channels.join(", ")),
            ));
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format issues as `warning: ...` / `error: ...` lines
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}", "error:".red().bold(), issue.message),
                Severity::Warning => format!("{} {}", "warning:".yellow().bold(), issue.message),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format the parameter key reference shown by `--show-config`
    pub fn format_known_keys(keys: &[ParameterKeyInfo]) -> String {
        let mut output = Self::section_header("Parameters");
        for info in keys {
            let tag = match info.requirement {
                Requirement::Required => "required".normal(),
                Requirement::Optional => "optional".dimmed(),
                Requirement::Host => "host".dimmed(),
            };
            output.push_str(&format!(
                "  {:<28} {:<8} {}\n",
                info.key.bold(),
                tag,
                info.description
            ));
        }
        output
    }

    fn gated(threshold: f64, applied: bool) -> String {
        if applied {
            threshold.to_string()
        } else {
            format!("{} (off)", threshold)
        }
    }

    fn field(label: &str, value: &str) -> String {
        format!("{:<16} {}\n", label.cyan().bold(), value)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_json(&self, config: &PipelineConfig) -> Result<String, RenderError> {
        Self::format_json(config)
    }

    fn format_toml(&self, config: &PipelineConfig) -> Result<String, RenderError> {
        Self::format_toml(config)
    }

    fn format_summary(&self, config: &PipelineConfig) -> String {
        Self::format_summary(config)
    }

    fn format_issues(&self, issues: &[ConfigIssue]) -> String {
        Self::format_issues(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segpipe_domain::fixtures::valid_parameters;
    use segpipe_domain::parameters::known_keys;
    use segpipe_domain::{ConfigIssueCode, OutputFormat, assemble};
    use std::path::Path;

    fn sample_config() -> PipelineConfig {
        let parameters = valid_parameters()
            .with("image_w", 320)
            .with("apply_threshold_borders", false);
        assemble(&parameters, Path::new("/data/exp")).unwrap()
    }

    #[test]
    fn test_json_uses_namespace_keys() {
        let json = ConsoleFormatter::format_json(&sample_config()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["execution"]["img_H-W"], serde_json::json!([256, 320]));
        assert!(value["tta_generator"].is_object());
    }

    #[test]
    fn test_toml_parses_back() {
        let config = sample_config();
        let rendered = ConsoleFormatter::format_toml(&config).unwrap();
        let parsed: PipelineConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_summary_mentions_key_values() {
        let summary = ConsoleFormatter::format_summary(&sample_config());
        assert!(summary.contains("256x320"));
        assert!(summary.contains("/data/exp/checkpoints/unet/best.torch"));
        assert!(summary.contains("8 passes"));
        assert!(summary.contains("0.5 (off)"));
        assert!(summary.contains("gmean on 4 threads"));
    }

    #[test]
    fn test_render_dispatches_on_format() {
        let config = sample_config();
        let formatter = ConsoleFormatter;
        let json = formatter.render(&config, OutputFormat::Json).unwrap();
        assert!(json.trim_start().starts_with('{'));
        let toml = formatter.render(&config, OutputFormat::Toml).unwrap();
        assert!(toml.contains("[execution]"));
    }

    #[test]
    fn test_known_keys_listing() {
        colored::control::set_override(false);
        let listing = ConsoleFormatter::format_known_keys(known_keys());
        let line = listing
            .lines()
            .find(|line| line.trim_start().starts_with("apply_threshold_seeds"))
            .unwrap();
        assert!(line.contains("required"));
        assert!(line.contains("Apply the seed threshold"));
        let line = listing
            .lines()
            .find(|line| line.trim_start().starts_with("tta_color_shift_runs"))
            .unwrap();
        assert!(line.contains("optional"));
        assert!(line.contains("default false"));
        assert_eq!(
            listing.lines().filter(|l| l.starts_with("  ")).count(),
            known_keys().len()
        );
    }

    #[test]
    fn test_format_issues() {
        let issues = vec![ConfigIssue {
            severity: Severity::Warning,
            code: ConfigIssueCode::UnrecognizedKey {
                key: "learning_rate".to_string(),
            },
            message: "unrecognized parameter 'learning_rate'".to_string(),
        }];
        let formatted = ConsoleFormatter::format_issues(&issues);
        assert!(formatted.contains("warning:"));
        assert!(formatted.contains("learning_rate"));
        assert!(ConsoleFormatter::format_issues(&[]).is_empty());
    }
}
