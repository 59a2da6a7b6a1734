//! Shared parameter fixtures for tests across the workspace.
//!
//! Compiled for this crate's own tests and, through the `test-fixtures`
//! feature, for the dev-dependencies of the other layers.

use crate::parameters::ParameterMap;
use crate::parameters::keys::*;

/// A complete, valid parameter mapping mirroring a typical salt run.
///
/// Host-only keys such as `experiment_dir` are not included.
pub fn valid_parameters() -> ParameterMap {
    ParameterMap::new()
        .with(NUM_WORKERS, 8)
        .with(IMAGE_H, 256)
        .with(IMAGE_W, 256)
        .with(BATCH_SIZE_TRAIN, 32)
        .with(BATCH_SIZE_INFERENCE, 64)
        .with(LOADER_MODE, "resize_and_pad")
        .with(EPOCHS_NR, 100)
        .with(PAD_METHOD, "edge")
        .with(IMAGE_SOURCE, "memory")
        .with(TARGET_FORMAT, "png")
        .with(PIN_MEMORY, true)
        .with(N_FILTERS, 16)
        .with(CONV_KERNEL, 3)
        .with(POOL_KERNEL, 3)
        .with(POOL_STRIDE, 2)
        .with(REPEAT_BLOCKS, 2)
        .with(USE_BATCH_NORM, true)
        .with(DROPOUT_CONV, 0.1)
        .with(IMAGE_CHANNELS, 3)
        .with(UNET_OUTPUT_CHANNELS, 2)
        .with(NR_UNET_OUTPUTS, 1)
        .with(ENCODER, "ResNet34")
        .with(UNET_ACTIVATION, "sigmoid")
        .with(LR, 0.0001)
        .with(L2_REG_CONV, 0.0001)
        .with(VALIDATION_METRIC_NAME, "iout")
        .with(MINIMIZE_VALIDATION_METRIC, false)
        .with(GAMMA, 0.95)
        .with(TRAIN_IMAGES_DIR, "data/train")
        .with(PATIENCE, 20)
        .with(TTA_AGGREGATION_METHOD, "gmean")
        .with(NUM_THREADS, 4)
        .with(THRESHOLD_MASKS, 0.5)
        .with(THRESHOLD_SEEDS, 0.5)
        .with(THRESHOLD_BORDERS, 0.5)
        .with(APPLY_THRESHOLD_MASKS, true)
        .with(APPLY_THRESHOLD_SEEDS, true)
        .with(APPLY_THRESHOLD_BORDERS, true)
        .with(MIN_MASK_SIZE, 20)
        .with(MIN_SEED_SIZE, 20)
}
