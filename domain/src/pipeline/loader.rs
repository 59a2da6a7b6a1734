//! `loader` namespace: dataset construction and per-phase loading.

use super::expected_one_of;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Total downsampling factor of the U-Net encoder. Input height and width
/// must be multiples of it. Fixed by the architecture, not a parameter.
pub const LOADER_DIVISOR: u32 = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub dataset_params: DatasetParams,
    pub loader_params: LoaderParams,
}

/// Dataset construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetParams {
    pub h: u32,
    pub w: u32,
    pub pad_method: PadMethod,
    pub image_source: ImageSource,
    pub divisor: u32,
    pub target_format: TargetFormat,
}

/// Loading parameters for the two phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderParams {
    pub training: PhaseLoaderParams,
    pub inference: PhaseLoaderParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseLoaderParams {
    pub batch_size: u32,
    pub shuffle: bool,
    pub num_workers: u32,
    pub pin_memory: bool,
}

impl LoaderParams {
    /// Build both phases. Training always shuffles, inference never does.
    pub fn new(
        batch_size_train: u32,
        batch_size_inference: u32,
        num_workers: u32,
        pin_memory: bool,
    ) -> Self {
        Self {
            training: PhaseLoaderParams {
                batch_size: batch_size_train,
                shuffle: true,
                num_workers,
                pin_memory,
            },
            inference: PhaseLoaderParams {
                batch_size: batch_size_inference,
                shuffle: false,
                num_workers,
                pin_memory,
            },
        }
    }
}

/// Padding applied when bringing images up to a multiple of the divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadMethod {
    Edge,
    Reflect,
    Replicate,
    Constant,
}

impl PadMethod {
    pub const ALL: [PadMethod; 4] = [
        PadMethod::Edge,
        PadMethod::Reflect,
        PadMethod::Replicate,
        PadMethod::Constant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PadMethod::Edge => "edge",
            PadMethod::Reflect => "reflect",
            PadMethod::Replicate => "replicate",
            PadMethod::Constant => "constant",
        }
    }
}

impl fmt::Display for PadMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PadMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| format!("unknown pad method '{}', {}", s, expected_one_of(&Self::ALL)))
    }
}

/// Where the dataset reads images from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Memory,
    Disk,
}

impl ImageSource {
    pub const ALL: [ImageSource; 2] = [ImageSource::Memory, ImageSource::Disk];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSource::Memory => "memory",
            ImageSource::Disk => "disk",
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ImageSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|src| src.as_str() == normalized)
            .ok_or_else(|| format!("unknown image source '{}', {}", s, expected_one_of(&Self::ALL)))
    }
}

/// Encoding of target masks on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetFormat {
    Png,
    Joblib,
    Json,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 3] = [TargetFormat::Png, TargetFormat::Joblib, TargetFormat::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFormat::Png => "png",
            TargetFormat::Joblib => "joblib",
            TargetFormat::Json => "json",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TargetFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown target format '{}', {}", s, expected_one_of(&Self::ALL)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_policy_is_fixed() {
        for pin_memory in [true, false] {
            let params = LoaderParams::new(32, 64, 8, pin_memory);
            assert!(params.training.shuffle);
            assert!(!params.inference.shuffle);
            assert_eq!(params.training.pin_memory, pin_memory);
            assert_eq!(params.inference.pin_memory, pin_memory);
        }
    }

    #[test]
    fn test_phase_batch_sizes() {
        let params = LoaderParams::new(16, 48, 2, false);
        assert_eq!(params.training.batch_size, 16);
        assert_eq!(params.inference.batch_size, 48);
        assert_eq!(params.training.num_workers, 2);
        assert_eq!(params.inference.num_workers, 2);
    }

    #[test]
    fn test_enum_parse() {
        assert_eq!("reflect".parse::<PadMethod>().unwrap(), PadMethod::Reflect);
        assert_eq!("Disk".parse::<ImageSource>().unwrap(), ImageSource::Disk);
        assert_eq!("png".parse::<TargetFormat>().unwrap(), TargetFormat::Png);
        assert!("tiff".parse::<TargetFormat>().is_err());
    }

    #[test]
    fn test_enum_serialize_snake_case() {
        let json = serde_json::to_string(&PadMethod::Edge).unwrap();
        assert_eq!(json, "\"edge\"");
        let source: ImageSource = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(source, ImageSource::Memory);
    }
}
