//! Strongly typed, validated pipeline parameters.
//!
//! [`PipelineParams::from_parameters`] is the single validation point between
//! a loosely typed [`ParameterMap`] and the rest of the crate. Keys are
//! checked in a fixed order and the first failure is returned.

use super::keys::*;
use super::map::ParameterMap;
use crate::core::error::ConfigError;
use crate::pipeline::{
    ActivationKind, AggregationMethod, ImageSource, LOADER_DIVISOR, LoaderMode, PadMethod,
    TargetFormat, TtaGeneratorConfig,
};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineParams {
    // Execution
    pub num_workers: u32,
    pub image_h: u32,
    pub image_w: u32,
    pub batch_size_train: u32,
    pub batch_size_inference: u32,
    pub loader_mode: LoaderMode,
    pub epochs_nr: u32,

    // Loader
    pub pad_method: PadMethod,
    pub image_source: ImageSource,
    pub target_format: TargetFormat,
    pub pin_memory: bool,

    // U-Net
    pub n_filters: u32,
    pub conv_kernel: u32,
    pub pool_kernel: u32,
    pub pool_stride: u32,
    pub repeat_blocks: u32,
    pub use_batch_norm: bool,
    pub dropout_conv: f64,
    pub image_channels: u32,
    pub unet_output_channels: u32,
    pub nr_unet_outputs: u32,
    pub encoder: String,
    pub unet_activation: ActivationKind,

    // Training
    pub lr: f64,
    pub l2_reg_conv: f64,
    pub validation_metric_name: String,
    pub minimize_validation_metric: bool,
    pub gamma: f64,
    pub train_images_dir: PathBuf,
    pub patience: u32,

    // TTA
    pub tta: TtaGeneratorConfig,
    pub tta_aggregation_method: AggregationMethod,
    pub num_threads: u32,

    // Post-processing
    pub threshold_masks: f64,
    pub threshold_seeds: f64,
    pub threshold_borders: f64,
    pub apply_threshold_masks: bool,
    pub apply_threshold_seeds: bool,
    pub apply_threshold_borders: bool,
    pub min_mask_size: u32,
    pub min_seed_size: u32,
}

impl PipelineParams {
    pub fn from_parameters(params: &ParameterMap) -> Result<Self, ConfigError> {
        let defaults = TtaGeneratorConfig::default();

        Ok(Self {
            num_workers: params.positive_int(NUM_WORKERS)?,
            image_h: image_dimension(params, IMAGE_H)?,
            image_w: image_dimension(params, IMAGE_W)?,
            batch_size_train: params.positive_int(BATCH_SIZE_TRAIN)?,
            batch_size_inference: params.positive_int(BATCH_SIZE_INFERENCE)?,
            loader_mode: params.parse(LOADER_MODE)?,
            epochs_nr: params.positive_int(EPOCHS_NR)?,

            pad_method: params.parse(PAD_METHOD)?,
            image_source: params.parse(IMAGE_SOURCE)?,
            target_format: params.parse(TARGET_FORMAT)?,
            pin_memory: params.bool(PIN_MEMORY)?,

            n_filters: params.positive_int(N_FILTERS)?,
            conv_kernel: params.positive_int(CONV_KERNEL)?,
            pool_kernel: params.positive_int(POOL_KERNEL)?,
            pool_stride: params.positive_int(POOL_STRIDE)?,
            repeat_blocks: params.positive_int(REPEAT_BLOCKS)?,
            use_batch_norm: params.bool(USE_BATCH_NORM)?,
            dropout_conv: params.number_where(DROPOUT_CONV, "in [0, 1)", |x| {
                (0.0..1.0).contains(&x)
            })?,
            image_channels: params.positive_int(IMAGE_CHANNELS)?,
            unet_output_channels: params.positive_int(UNET_OUTPUT_CHANNELS)?,
            nr_unet_outputs: params.positive_int(NR_UNET_OUTPUTS)?,
            encoder: params.string(ENCODER)?.to_string(),
            unet_activation: params.parse(UNET_ACTIVATION)?,

            lr: params.number_where(LR, "greater than 0", |x| x > 0.0)?,
            l2_reg_conv: params.number_where(L2_REG_CONV, "zero or greater", |x| x >= 0.0)?,
            validation_metric_name: params.string(VALIDATION_METRIC_NAME)?.to_string(),
            minimize_validation_metric: params.bool(MINIMIZE_VALIDATION_METRIC)?,
            gamma: params.number_where(GAMMA, "in (0, 1]", |x| x > 0.0 && x <= 1.0)?,
            train_images_dir: PathBuf::from(params.string(TRAIN_IMAGES_DIR)?),
            patience: params.positive_int(PATIENCE)?,

            tta: TtaGeneratorConfig {
                flip_ud: params.bool_or(TTA_FLIP_UD, defaults.flip_ud)?,
                flip_lr: params.bool_or(TTA_FLIP_LR, defaults.flip_lr)?,
                rotation: params.bool_or(TTA_ROTATION, defaults.rotation)?,
                color_shift_runs: params.bool_or(TTA_COLOR_SHIFT_RUNS, defaults.color_shift_runs)?,
            },
            tta_aggregation_method: params.parse(TTA_AGGREGATION_METHOD)?,
            num_threads: params.positive_int(NUM_THREADS)?,

            threshold_masks: probability(params, THRESHOLD_MASKS)?,
            threshold_seeds: probability(params, THRESHOLD_SEEDS)?,
            threshold_borders: probability(params, THRESHOLD_BORDERS)?,
            apply_threshold_masks: params.bool(APPLY_THRESHOLD_MASKS)?,
            apply_threshold_seeds: params.bool(APPLY_THRESHOLD_SEEDS)?,
            apply_threshold_borders: params.bool(APPLY_THRESHOLD_BORDERS)?,
            min_mask_size: params.non_negative_int(MIN_MASK_SIZE)?,
            min_seed_size: params.non_negative_int(MIN_SEED_SIZE)?,
        })
    }
}

/// Positive and a multiple of [`LOADER_DIVISOR`].
fn image_dimension(params: &ParameterMap, key: &str) -> Result<u32, ConfigError> {
    let value = params.positive_int(key)?;
    if value % LOADER_DIVISOR != 0 {
        return Err(ConfigError::invalid_value(
            key,
            format!("must be divisible by {}, got {}", LOADER_DIVISOR, value),
        ));
    }
    Ok(value)
}

fn probability(params: &ParameterMap, key: &str) -> Result<f64, ConfigError> {
    params.number_where(key, "in [0, 1]", |x| (0.0..=1.0).contains(&x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::valid_parameters;

    #[test]
    fn test_valid_parameters_resolve() {
        let params = PipelineParams::from_parameters(&valid_parameters()).unwrap();
        assert_eq!(params.batch_size_train, 32);
        assert_eq!(params.loader_mode, LoaderMode::ResizeAndPad);
        assert_eq!(params.unet_activation, ActivationKind::Sigmoid);
        assert_eq!(params.tta_aggregation_method, AggregationMethod::Gmean);
        assert_eq!(params.train_images_dir, PathBuf::from("data/train"));
    }

    #[test]
    fn test_every_required_key_is_enforced() {
        for key in required_keys() {
            let mut params = valid_parameters();
            assert!(params.remove(key).is_some(), "fixture lacks {}", key);
            let err = PipelineParams::from_parameters(&params).unwrap_err();
            assert_eq!(err, ConfigError::missing(key));
        }
    }

    #[test]
    fn test_tta_toggles_default_when_absent() {
        let params = PipelineParams::from_parameters(&valid_parameters()).unwrap();
        assert_eq!(params.tta, TtaGeneratorConfig::default());
    }

    #[test]
    fn test_missing_threshold_gate_is_not_defaulted() {
        for key in [APPLY_THRESHOLD_MASKS, APPLY_THRESHOLD_SEEDS, APPLY_THRESHOLD_BORDERS] {
            let mut params = valid_parameters();
            params.remove(key);
            let err = PipelineParams::from_parameters(&params).unwrap_err();
            assert_eq!(err, ConfigError::missing(key));
        }
    }

    #[test]
    fn test_optional_overrides() {
        let map = valid_parameters()
            .with(TTA_COLOR_SHIFT_RUNS, true)
            .with(APPLY_THRESHOLD_BORDERS, false);
        let params = PipelineParams::from_parameters(&map).unwrap();
        assert!(params.tta.color_shift_runs);
        assert!(!params.apply_threshold_borders);
        assert!(params.apply_threshold_masks);
    }

    #[test]
    fn test_negative_batch_size() {
        let map = valid_parameters().with(BATCH_SIZE_TRAIN, -8);
        let err = PipelineParams::from_parameters(&map).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameterValue { .. }));
        assert_eq!(err.key(), BATCH_SIZE_TRAIN);
    }

    #[test]
    fn test_string_batch_size_is_type_error() {
        let map = valid_parameters().with(BATCH_SIZE_TRAIN, "32");
        let err = PipelineParams::from_parameters(&map).unwrap_err();
        assert_eq!(
            err,
            ConfigError::invalid_type(BATCH_SIZE_TRAIN, "an integer", "a string")
        );
    }

    #[test]
    fn test_non_boolean_flag() {
        let map = valid_parameters().with(PIN_MEMORY, "yes");
        let err = PipelineParams::from_parameters(&map).unwrap_err();
        assert_eq!(
            err,
            ConfigError::invalid_type(PIN_MEMORY, "a boolean", "a string")
        );

        let map = valid_parameters().with(TTA_FLIP_LR, 1);
        let err = PipelineParams::from_parameters(&map).unwrap_err();
        assert_eq!(err.key(), TTA_FLIP_LR);
    }

    #[test]
    fn test_image_dimension_divisibility() {
        let ok = valid_parameters().with(IMAGE_H, 320).with(IMAGE_W, 320);
        assert!(PipelineParams::from_parameters(&ok).is_ok());

        let bad = valid_parameters().with(IMAGE_H, 100);
        let err = PipelineParams::from_parameters(&bad).unwrap_err();
        assert_eq!(
            err,
            ConfigError::invalid_value(IMAGE_H, "must be divisible by 64, got 100")
        );

        let bad = valid_parameters().with(IMAGE_W, 200);
        let err = PipelineParams::from_parameters(&bad).unwrap_err();
        assert_eq!(err.key(), IMAGE_W);
    }

    #[test]
    fn test_threshold_outside_unit_interval() {
        let map = valid_parameters().with(THRESHOLD_SEEDS, 1.5);
        let err = PipelineParams::from_parameters(&map).unwrap_err();
        assert_eq!(
            err,
            ConfigError::invalid_value(THRESHOLD_SEEDS, "must be in [0, 1], got 1.5")
        );
    }

    #[test]
    fn test_threshold_bounds_inclusive() {
        let map = valid_parameters()
            .with(THRESHOLD_MASKS, 0)
            .with(THRESHOLD_BORDERS, 1.0);
        let params = PipelineParams::from_parameters(&map).unwrap();
        assert_eq!(params.threshold_masks, 0.0);
        assert_eq!(params.threshold_borders, 1.0);
    }

    #[test]
    fn test_numeric_domains() {
        let cases = [
            (DROPOUT_CONV, 1.0),
            (LR, 0.0),
            (L2_REG_CONV, -0.1),
            (GAMMA, 0.0),
            (GAMMA, 1.2),
        ];
        for (key, value) in cases {
            let map = valid_parameters().with(key, value);
            let err = PipelineParams::from_parameters(&map).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidParameterValue { .. }),
                "{} = {} should be rejected",
                key,
                value
            );
            assert_eq!(err.key(), key);
        }
    }

    #[test]
    fn test_unknown_enum_value() {
        let map = valid_parameters().with(LOADER_MODE, "stretch");
        let err = PipelineParams::from_parameters(&map).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameterValue { .. }));
        assert_eq!(err.key(), LOADER_MODE);
    }

    #[test]
    fn test_min_sizes_accept_zero() {
        let map = valid_parameters().with(MIN_MASK_SIZE, 0).with(MIN_SEED_SIZE, 0);
        let params = PipelineParams::from_parameters(&map).unwrap();
        assert_eq!(params.min_mask_size, 0);
        assert_eq!(params.min_seed_size, 0);
    }
}
