//! Parameter key registry.
//!
//! Names every flat parameter the assembler understands, together with a
//! description and whether it must be supplied. Used to report keys a
//! parameter source provides that nothing consumes.

pub const EXPERIMENT_DIR: &str = "experiment_dir";

pub const NUM_WORKERS: &str = "num_workers";
pub const IMAGE_H: &str = "image_h";
pub const IMAGE_W: &str = "image_w";
pub const BATCH_SIZE_TRAIN: &str = "batch_size_train";
pub const BATCH_SIZE_INFERENCE: &str = "batch_size_inference";
pub const LOADER_MODE: &str = "loader_mode";
pub const EPOCHS_NR: &str = "epochs_nr";

pub const PAD_METHOD: &str = "pad_method";
pub const IMAGE_SOURCE: &str = "image_source";
pub const TARGET_FORMAT: &str = "target_format";
pub const PIN_MEMORY: &str = "pin_memory";

pub const N_FILTERS: &str = "n_filters";
pub const CONV_KERNEL: &str = "conv_kernel";
pub const POOL_KERNEL: &str = "pool_kernel";
pub const POOL_STRIDE: &str = "pool_stride";
pub const REPEAT_BLOCKS: &str = "repeat_blocks";
pub const USE_BATCH_NORM: &str = "use_batch_norm";
pub const DROPOUT_CONV: &str = "dropout_conv";
pub const IMAGE_CHANNELS: &str = "image_channels";
pub const UNET_OUTPUT_CHANNELS: &str = "unet_output_channels";
pub const NR_UNET_OUTPUTS: &str = "nr_unet_outputs";
pub const ENCODER: &str = "encoder";
pub const UNET_ACTIVATION: &str = "unet_activation";

pub const LR: &str = "lr";
pub const L2_REG_CONV: &str = "l2_reg_conv";
pub const VALIDATION_METRIC_NAME: &str = "validation_metric_name";
pub const MINIMIZE_VALIDATION_METRIC: &str = "minimize_validation_metric";
pub const GAMMA: &str = "gamma";
pub const TRAIN_IMAGES_DIR: &str = "train_images_dir";
pub const PATIENCE: &str = "patience";

pub const TTA_FLIP_UD: &str = "tta_flip_ud";
pub const TTA_FLIP_LR: &str = "tta_flip_lr";
pub const TTA_ROTATION: &str = "tta_rotation";
pub const TTA_COLOR_SHIFT_RUNS: &str = "tta_color_shift_runs";
pub const TTA_AGGREGATION_METHOD: &str = "tta_aggregation_method";
pub const NUM_THREADS: &str = "num_threads";

pub const THRESHOLD_MASKS: &str = "threshold_masks";
pub const THRESHOLD_SEEDS: &str = "threshold_seeds";
pub const THRESHOLD_BORDERS: &str = "threshold_borders";
pub const APPLY_THRESHOLD_MASKS: &str = "apply_threshold_masks";
pub const APPLY_THRESHOLD_SEEDS: &str = "apply_threshold_seeds";
pub const APPLY_THRESHOLD_BORDERS: &str = "apply_threshold_borders";
pub const MIN_MASK_SIZE: &str = "min_mask_size";
pub const MIN_SEED_SIZE: &str = "min_seed_size";

/// Whether a key has to be present in the parameter mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Assembly fails without it.
    Required,
    /// Falls back to a documented default when absent.
    Optional,
    /// Read by the hosting layer, not by the assembler itself.
    Host,
}

/// Metadata for a single parameter key.
#[derive(Debug, Clone)]
pub struct ParameterKeyInfo {
    pub key: &'static str,
    pub description: &'static str,
    pub requirement: Requirement,
}

const fn required(key: &'static str, description: &'static str) -> ParameterKeyInfo {
    ParameterKeyInfo {
        key,
        description,
        requirement: Requirement::Required,
    }
}

const fn optional(key: &'static str, description: &'static str) -> ParameterKeyInfo {
    ParameterKeyInfo {
        key,
        description,
        requirement: Requirement::Optional,
    }
}

/// All known parameter keys with their metadata.
pub fn known_keys() -> &'static [ParameterKeyInfo] {
    KNOWN_KEYS
}

/// Look up a parameter key by name.
pub fn lookup_key(key: &str) -> Option<&'static ParameterKeyInfo> {
    KNOWN_KEYS.iter().find(|k| k.key == key)
}

/// Keys the assembler cannot run without.
pub fn required_keys() -> impl Iterator<Item = &'static str> {
    KNOWN_KEYS
        .iter()
        .filter(|k| k.requirement == Requirement::Required)
        .map(|k| k.key)
}

static KNOWN_KEYS: &[ParameterKeyInfo] = &[
    ParameterKeyInfo {
        key: EXPERIMENT_DIR,
        description: "Experiment root directory for checkpoints and cached artifacts",
        requirement: Requirement::Host,
    },
    // ==================== Execution ====================
    required(NUM_WORKERS, "Data-loading worker count"),
    required(IMAGE_H, "Input image height, divisible by 64"),
    required(IMAGE_W, "Input image width, divisible by 64"),
    required(BATCH_SIZE_TRAIN, "Training batch size"),
    required(BATCH_SIZE_INFERENCE, "Inference batch size"),
    required(LOADER_MODE, "Image loading mode: resize_and_pad, resize, pad, crop_and_pad"),
    required(EPOCHS_NR, "Number of training epochs"),
    // ==================== Loader ====================
    required(PAD_METHOD, "Padding method: edge, reflect, replicate, constant"),
    required(IMAGE_SOURCE, "Where images are read from: memory or disk"),
    required(TARGET_FORMAT, "Target mask encoding: png, joblib, json"),
    required(PIN_MEMORY, "Pin host memory for data loader batches"),
    // ==================== U-Net ====================
    required(N_FILTERS, "Filters in the first convolution block"),
    required(CONV_KERNEL, "Convolution kernel size"),
    required(POOL_KERNEL, "Pooling kernel size"),
    required(POOL_STRIDE, "Pooling stride"),
    required(REPEAT_BLOCKS, "Convolutions per block"),
    required(USE_BATCH_NORM, "Enable batch normalization"),
    required(DROPOUT_CONV, "Dropout rate in [0, 1)"),
    required(IMAGE_CHANNELS, "Input channels"),
    required(UNET_OUTPUT_CHANNELS, "Output channels"),
    required(NR_UNET_OUTPUTS, "Number of network output heads"),
    required(ENCODER, "Encoder identifier"),
    required(UNET_ACTIVATION, "Output activation: sigmoid or softmax"),
    // ==================== Training ====================
    required(LR, "Optimizer learning rate"),
    required(L2_REG_CONV, "L2 weight decay for conv layers"),
    required(VALIDATION_METRIC_NAME, "Metric monitored for checkpointing and early stopping"),
    required(MINIMIZE_VALIDATION_METRIC, "Whether lower metric values are better"),
    required(GAMMA, "Learning-rate decay factor in (0, 1]"),
    required(TRAIN_IMAGES_DIR, "Directory of training images used by validation monitoring"),
    required(PATIENCE, "Early stopping patience in epochs"),
    // ==================== TTA ====================
    optional(TTA_FLIP_UD, "Vertical flip augmentation (default true)"),
    optional(TTA_FLIP_LR, "Horizontal flip augmentation (default true)"),
    optional(TTA_ROTATION, "Rotation augmentation (default true)"),
    optional(TTA_COLOR_SHIFT_RUNS, "Color-shift augmentation (default false)"),
    required(TTA_AGGREGATION_METHOD, "TTA aggregation: mean, gmean, max, min"),
    required(NUM_THREADS, "TTA aggregation thread count"),
    // ==================== Post-processing ====================
    required(THRESHOLD_MASKS, "Mask binarization threshold in [0, 1]"),
    required(THRESHOLD_SEEDS, "Seed binarization threshold in [0, 1]"),
    required(THRESHOLD_BORDERS, "Border binarization threshold in [0, 1]"),
    required(APPLY_THRESHOLD_MASKS, "Apply the mask threshold"),
    required(APPLY_THRESHOLD_SEEDS, "Apply the seed threshold"),
    required(APPLY_THRESHOLD_BORDERS, "Apply the border threshold"),
    required(MIN_MASK_SIZE, "Minimum mask component size in pixels"),
    required(MIN_SEED_SIZE, "Minimum seed component size in pixels"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_known_keys_unique() {
        let mut seen = HashSet::new();
        for info in known_keys() {
            assert!(seen.insert(info.key), "duplicate key {}", info.key);
        }
    }

    #[test]
    fn test_lookup_existing_key() {
        let info = lookup_key("batch_size_train").unwrap();
        assert_eq!(info.requirement, Requirement::Required);
    }

    #[test]
    fn test_threshold_gates_are_required() {
        for key in [APPLY_THRESHOLD_MASKS, APPLY_THRESHOLD_SEEDS, APPLY_THRESHOLD_BORDERS] {
            assert_eq!(lookup_key(key).unwrap().requirement, Requirement::Required);
        }
    }

    #[test]
    fn test_lookup_nonexistent_key() {
        assert!(lookup_key("nonexistent_key").is_none());
    }

    #[test]
    fn test_requirement_counts() {
        assert_eq!(required_keys().count(), 40);
        let optional = known_keys()
            .iter()
            .filter(|k| k.requirement == Requirement::Optional)
            .count();
        assert_eq!(optional, 4);
        assert_eq!(
            lookup_key(EXPERIMENT_DIR).unwrap().requirement,
            Requirement::Host
        );
    }
}
