//! `env` and `execution` namespaces: shared roots and cross-cutting knobs.

use super::expected_one_of;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Number of segmentation classes (background, salt).
pub const NUM_CLASSES: u32 = 2;

/// Shared filesystem root for cached and intermediate artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    pub cache_dirpath: PathBuf,
}

/// Cross-cutting runtime settings read by several stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    pub exp_root: PathBuf,
    pub num_workers: u32,
    pub num_classes: u32,
    /// `(height, width)` of network input images.
    #[serde(rename = "img_H-W")]
    pub img_hw: (u32, u32),
    pub batch_size_train: u32,
    pub batch_size_inference: u32,
    pub loader_mode: LoaderMode,
}

/// How raw images are brought to the network input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderMode {
    ResizeAndPad,
    Resize,
    Pad,
    CropAndPad,
}

impl LoaderMode {
    pub const ALL: [LoaderMode; 4] = [
        LoaderMode::ResizeAndPad,
        LoaderMode::Resize,
        LoaderMode::Pad,
        LoaderMode::CropAndPad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoaderMode::ResizeAndPad => "resize_and_pad",
            LoaderMode::Resize => "resize",
            LoaderMode::Pad => "pad",
            LoaderMode::CropAndPad => "crop_and_pad",
        }
    }
}

impl fmt::Display for LoaderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LoaderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| format!("unknown loader mode '{}', {}", s, expected_one_of(&Self::ALL)))
    }
}
