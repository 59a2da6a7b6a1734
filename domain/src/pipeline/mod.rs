//! The nested pipeline configuration and its assembler.
//!
//! [`assemble`] turns a flat [`ParameterMap`] plus an experiment root into a
//! [`PipelineConfig`] with fixed namespaces, one per pipeline stage:
//!
//! | Namespace | Consumer |
//! |-----------|----------|
//! | `env` | artifact cache |
//! | `execution` | every stage |
//! | `xy_splitter`, `reader` | data splitting and reading |
//! | `loader` | dataset and data loaders |
//! | `model` | U-Net training loop |
//! | `tta_generator`, `tta_aggregator` | test-time augmentation |
//! | `thresholder`, `watershed`, `dropper`, `postprocessor` | post-processing |
//!
//! Assembly performs no I/O. The only derived value is the checkpoint path.

mod columns;
mod execution;
mod loader;
mod model;
mod postprocessing;
mod tta;

pub use columns::{ColumnConfig, ModelColumns, X_COLUMNS, Y_COLUMNS};
pub use execution::{EnvConfig, ExecutionConfig, LoaderMode, NUM_CLASSES};
pub use loader::{
    DatasetParams, ImageSource, LOADER_DIVISOR, LoaderConfig, LoaderParams, PadMethod,
    PhaseLoaderParams, TargetFormat,
};
pub use model::{
    ActivationKind, ArchitectureConfig, CALLBACK_NAMES, CHECKPOINT_EXTENSION, CallbacksConfig,
    EarlyStoppingConfig, LrSchedulerConfig, ModelCheckpointConfig, ModelConfig, ModelParams,
    MonitorConfig, NeptuneMonitorConfig, OptimizerParams, RegularizerParams, TrainingConfig,
    UNET_MODEL_NAME, UnetConfig, ValidationMonitorConfig, WeightInitFunction, WeightsInit,
    checkpoint_path,
};
pub use postprocessing::{
    CHANNELS_SIGMOID, DropperConfig, PostprocessorConfig, ThresholderConfig, WatershedConfig,
};
pub use tta::{AggregationMethod, TtaAggregatorConfig, TtaGeneratorConfig, TtaVariant};

use crate::core::error::ConfigError;
use crate::parameters::{EXPERIMENT_DIR, ParameterMap, PipelineParams};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;

/// Complete, read-only configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub env: EnvConfig,
    pub execution: ExecutionConfig,
    pub xy_splitter: ModelColumns,
    pub reader: ModelColumns,
    pub loader: LoaderConfig,
    pub model: ModelConfig,
    pub tta_generator: TtaGeneratorConfig,
    pub tta_aggregator: TtaAggregatorConfig,
    pub thresholder: ThresholderConfig,
    pub watershed: WatershedConfig,
    pub dropper: DropperConfig,
    pub postprocessor: PostprocessorConfig,
}

/// Resolve flat parameters into a [`PipelineConfig`].
///
/// Fails on the first missing or invalid parameter; no partial
/// configuration is ever returned.
pub fn assemble(
    parameters: &ParameterMap,
    experiment_root: &Path,
) -> Result<PipelineConfig, ConfigError> {
    if experiment_root.as_os_str().is_empty() {
        return Err(ConfigError::invalid_value(
            EXPERIMENT_DIR,
            "experiment root must not be empty",
        ));
    }
    let params = PipelineParams::from_parameters(parameters)?;
    Ok(PipelineConfig::from_params(&params, experiment_root))
}

impl PipelineConfig {
    /// Build every namespace from already validated parameters.
    pub fn from_params(params: &PipelineParams, experiment_root: &Path) -> Self {
        let exp_root = experiment_root.to_path_buf();

        Self {
            env: EnvConfig {
                cache_dirpath: exp_root.clone(),
            },
            execution: ExecutionConfig {
                exp_root: exp_root.clone(),
                num_workers: params.num_workers,
                num_classes: NUM_CLASSES,
                img_hw: (params.image_h, params.image_w),
                batch_size_train: params.batch_size_train,
                batch_size_inference: params.batch_size_inference,
                loader_mode: params.loader_mode,
            },
            xy_splitter: ModelColumns::new(),
            reader: ModelColumns::new(),
            loader: LoaderConfig {
                dataset_params: DatasetParams {
                    h: params.image_h,
                    w: params.image_w,
                    pad_method: params.pad_method,
                    image_source: params.image_source,
                    divisor: LOADER_DIVISOR,
                    target_format: params.target_format,
                },
                loader_params: LoaderParams::new(
                    params.batch_size_train,
                    params.batch_size_inference,
                    params.num_workers,
                    params.pin_memory,
                ),
            },
            model: ModelConfig {
                unet: unet_config(params, &exp_root),
            },
            tta_generator: params.tta.clone(),
            tta_aggregator: TtaAggregatorConfig {
                method: params.tta_aggregation_method,
                nthreads: params.num_threads,
            },
            thresholder: ThresholderConfig {
                threshold_masks: params.threshold_masks,
                threshold_seeds: params.threshold_seeds,
                threshold_borders: params.threshold_borders,
                apply_threshold_masks: params.apply_threshold_masks,
                apply_threshold_seeds: params.apply_threshold_seeds,
                apply_threshold_borders: params.apply_threshold_borders,
            },
            watershed: WatershedConfig::default(),
            dropper: DropperConfig {
                min_mask_size: params.min_mask_size,
                min_seed_size: params.min_seed_size,
            },
            postprocessor: PostprocessorConfig::salt(),
        }
    }

    /// Where the training loop writes the best U-Net weights.
    pub fn checkpoint_path(&self) -> &Path {
        &self.model.unet.callbacks_config.model_checkpoint.filepath
    }
}

fn unet_config(params: &PipelineParams, exp_root: &Path) -> UnetConfig {
    UnetConfig {
        architecture_config: ArchitectureConfig {
            model_params: ModelParams {
                n_filters: params.n_filters,
                conv_kernel: params.conv_kernel,
                pool_kernel: params.pool_kernel,
                pool_stride: params.pool_stride,
                repeat_blocks: params.repeat_blocks,
                batch_norm: params.use_batch_norm,
                dropout: params.dropout_conv,
                in_channels: params.image_channels,
                out_channels: params.unet_output_channels,
                nr_outputs: params.nr_unet_outputs,
                encoder: params.encoder.clone(),
                activation: params.unet_activation,
            },
            optimizer_params: OptimizerParams { lr: params.lr },
            regularizer_params: RegularizerParams {
                regularize: true,
                weight_decay_conv2d: params.l2_reg_conv,
            },
            weights_init: WeightsInit {
                function: WeightInitFunction::Xavier,
            },
        },
        training_config: TrainingConfig {
            epochs: params.epochs_nr,
            shuffle: true,
            batch_size: params.batch_size_train,
        },
        callbacks_config: CallbacksConfig {
            model_checkpoint: ModelCheckpointConfig {
                filepath: checkpoint_path(exp_root, UNET_MODEL_NAME, CHECKPOINT_EXTENSION),
                epoch_every: 1,
                metric_name: params.validation_metric_name.clone(),
                minimize: params.minimize_validation_metric,
            },
            lr_scheduler: LrSchedulerConfig {
                gamma: params.gamma,
                epoch_every: 1,
            },
            training_monitor: MonitorConfig::per_epoch(),
            experiment_timing: MonitorConfig::per_epoch(),
            validation_monitor: ValidationMonitorConfig {
                epoch_every: 1,
                data_dir: params.train_images_dir.clone(),
                loader_mode: params.loader_mode,
            },
            neptune_monitor: NeptuneMonitorConfig::for_model(UNET_MODEL_NAME),
            early_stopping: EarlyStoppingConfig {
                patience: params.patience,
                metric_name: params.validation_metric_name.clone(),
                minimize: params.minimize_validation_metric,
            },
        },
    }
}

/// "expected one of: a, b, c" for enum parse errors.
pub(crate) fn expected_one_of<T: Display>(values: &[T]) -> String {
    let names: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("expected one of: {}", names.join(", "))
}
