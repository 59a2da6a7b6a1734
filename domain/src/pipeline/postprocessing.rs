//! Post-processing namespaces: `thresholder`, `watershed`, `dropper`,
//! `postprocessor`.

use super::model::ActivationKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Channels interpreted as independent sigmoid outputs.
pub const CHANNELS_SIGMOID: &[&str] = &["salt"];

/// Binarization thresholds and the gates deciding whether each is applied.
///
/// A gate set to `false` tells the thresholder to pass that map through
/// unchanged; the numeric value is still carried so it can be re-enabled
/// without re-tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholderConfig {
    pub threshold_masks: f64,
    pub threshold_seeds: f64,
    pub threshold_borders: f64,
    pub apply_threshold_masks: bool,
    pub apply_threshold_seeds: bool,
    pub apply_threshold_borders: bool,
}

/// Watershed splitting has no tunables yet; the namespace is reserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatershedConfig {}

/// Minimum connected-component sizes, in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropperConfig {
    pub min_mask_size: u32,
    pub min_seed_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostprocessorConfig {
    /// Activation kind → semantic channel names produced with it.
    pub channels: BTreeMap<ActivationKind, Vec<String>>,
}

impl PostprocessorConfig {
    /// Channel layout of the salt model: one sigmoid channel.
    pub fn salt() -> Self {
        let mut channels = BTreeMap::new();
        channels.insert(
            ActivationKind::Sigmoid,
            CHANNELS_SIGMOID.iter().map(|c| c.to_string()).collect(),
        );
        Self { channels }
    }

    pub fn channels_for(&self, activation: ActivationKind) -> &[String] {
        self.channels
            .get(&activation)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
