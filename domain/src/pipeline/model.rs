//! `model` namespace: U-Net architecture, training schedule and callbacks.

use super::expected_one_of;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the only model variant this pipeline trains.
pub const UNET_MODEL_NAME: &str = "unet";
/// File extension of serialized model weights.
pub const CHECKPOINT_EXTENSION: &str = "torch";

/// Location of the best checkpoint for `model_name` under `experiment_root`.
///
/// `<experiment_root>/checkpoints/<model_name>/best.<extension>`, joined with
/// platform path semantics. Pure string construction; nothing is created.
pub fn checkpoint_path(experiment_root: &Path, model_name: &str, extension: &str) -> PathBuf {
    experiment_root
        .join("checkpoints")
        .join(model_name)
        .join(format!("best.{}", extension))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub unet: UnetConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnetConfig {
    pub architecture_config: ArchitectureConfig,
    pub training_config: TrainingConfig,
    pub callbacks_config: CallbacksConfig,
}

// ==================== Architecture ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureConfig {
    pub model_params: ModelParams,
    pub optimizer_params: OptimizerParams,
    pub regularizer_params: RegularizerParams,
    pub weights_init: WeightsInit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub n_filters: u32,
    pub conv_kernel: u32,
    pub pool_kernel: u32,
    pub pool_stride: u32,
    pub repeat_blocks: u32,
    pub batch_norm: bool,
    pub dropout: f64,
    pub in_channels: u32,
    pub out_channels: u32,
    pub nr_outputs: u32,
    pub encoder: String,
    pub activation: ActivationKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerParams {
    pub lr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularizerParams {
    pub regularize: bool,
    pub weight_decay_conv2d: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsInit {
    pub function: WeightInitFunction,
}

/// Weight initialization scheme; the U-Net is always Xavier-initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInitFunction {
    #[default]
    Xavier,
}

/// Output activation of a network head.
///
/// Also keys `postprocessor.channels`, so variants are only ever added.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ActivationKind {
    Sigmoid,
    Softmax,
}

impl ActivationKind {
    pub const ALL: [ActivationKind; 2] = [ActivationKind::Sigmoid, ActivationKind::Softmax];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivationKind::Sigmoid => "sigmoid",
            ActivationKind::Softmax => "softmax",
        }
    }
}

impl fmt::Display for ActivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| format!("unknown activation '{}', {}", s, expected_one_of(&Self::ALL)))
    }
}

// ==================== Training ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub epochs: u32,
    pub shuffle: bool,
    pub batch_size: u32,
}

// ==================== Callbacks ====================

/// Names of the callbacks the training loop expects, in declaration order.
pub const CALLBACK_NAMES: [&str; 7] = [
    "model_checkpoint",
    "lr_scheduler",
    "training_monitor",
    "experiment_timing",
    "validation_monitor",
    "neptune_monitor",
    "early_stopping",
];

/// All seven callbacks must be present even when a trigger is tuned never
/// to fire (e.g. `batch_every = 0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbacksConfig {
    pub model_checkpoint: ModelCheckpointConfig,
    pub lr_scheduler: LrSchedulerConfig,
    pub training_monitor: MonitorConfig,
    pub experiment_timing: MonitorConfig,
    pub validation_monitor: ValidationMonitorConfig,
    pub neptune_monitor: NeptuneMonitorConfig,
    pub early_stopping: EarlyStoppingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCheckpointConfig {
    pub filepath: PathBuf,
    pub epoch_every: u32,
    pub metric_name: String,
    pub minimize: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LrSchedulerConfig {
    pub gamma: f64,
    pub epoch_every: u32,
}

/// Cadence for monitors that fire on batch and/or epoch boundaries.
/// A value of 0 disables that trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub batch_every: u32,
    pub epoch_every: u32,
}

impl MonitorConfig {
    /// Once per epoch, never per batch.
    pub fn per_epoch() -> Self {
        Self {
            batch_every: 0,
            epoch_every: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMonitorConfig {
    pub epoch_every: u32,
    pub data_dir: PathBuf,
    pub loader_mode: super::LoaderMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeptuneMonitorConfig {
    pub model_name: String,
    pub image_nr: u32,
    pub image_resize: f64,
}

impl NeptuneMonitorConfig {
    pub fn for_model(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            image_nr: 4,
            image_resize: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyStoppingConfig {
    pub patience: u32,
    pub metric_name: String,
    pub minimize: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_path_layout() {
        let path = checkpoint_path(Path::new("/data/exp"), "unet", "torch");
        assert_eq!(path, PathBuf::from("/data/exp/checkpoints/unet/best.torch"));
    }

    #[test]
    fn test_checkpoint_path_ignores_trailing_separator() {
        let with = checkpoint_path(Path::new("/data/exp/"), UNET_MODEL_NAME, CHECKPOINT_EXTENSION);
        let without = checkpoint_path(Path::new("/data/exp"), UNET_MODEL_NAME, CHECKPOINT_EXTENSION);
        assert_eq!(with, without);
        assert_eq!(with.to_str(), without.to_str());
    }

    #[test]
    fn test_checkpoint_path_relative_root() {
        let path = checkpoint_path(Path::new("runs"), "unet", "torch");
        assert_eq!(path, Path::new("runs").join("checkpoints").join("unet").join("best.torch"));
    }

    #[test]
    fn test_activation_parse() {
        assert_eq!(
            "sigmoid".parse::<ActivationKind>().unwrap(),
            ActivationKind::Sigmoid
        );
        assert!("relu".parse::<ActivationKind>().is_err());
    }

    #[test]
    fn test_monitor_per_epoch() {
        let monitor = MonitorConfig::per_epoch();
        assert_eq!(monitor.batch_every, 0);
        assert_eq!(monitor.epoch_every, 1);
    }

    #[test]
    fn test_weight_init_default_is_xavier() {
        assert_eq!(WeightInitFunction::default(), WeightInitFunction::Xavier);
        assert_eq!(
            serde_json::to_string(&WeightInitFunction::Xavier).unwrap(),
            "\"xavier\""
        );
    }
}
