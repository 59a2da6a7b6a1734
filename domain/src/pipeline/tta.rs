//! `tta_generator` and `tta_aggregator` namespaces.
//!
//! The generator holds independent augmentation toggles; its consumer runs
//! inference once per combination of enabled toggles and the aggregator
//! folds the resulting predictions into one.

use super::expected_one_of;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Test-time augmentation toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtaGeneratorConfig {
    pub flip_ud: bool,
    pub flip_lr: bool,
    pub rotation: bool,
    pub color_shift_runs: bool,
}

impl Default for TtaGeneratorConfig {
    fn default() -> Self {
        Self {
            flip_ud: true,
            flip_lr: true,
            rotation: true,
            color_shift_runs: false,
        }
    }
}

/// One augmented inference pass: which transforms are applied.
///
/// The all-false variant is the identity pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TtaVariant {
    pub flip_ud: bool,
    pub flip_lr: bool,
    pub rotation: bool,
    pub color_shift: bool,
}

impl TtaGeneratorConfig {
    pub fn enabled_count(&self) -> u32 {
        [self.flip_ud, self.flip_lr, self.rotation, self.color_shift_runs]
            .into_iter()
            .filter(|enabled| *enabled)
            .count() as u32
    }

    /// Number of inference passes: every subset of the enabled toggles.
    pub fn variant_count(&self) -> usize {
        1 << self.enabled_count()
    }

    /// Cartesian product of the enabled toggles, identity first.
    pub fn variants(&self) -> Vec<TtaVariant> {
        fn options(enabled: bool) -> &'static [bool] {
            if enabled { &[false, true] } else { &[false] }
        }

        let mut variants = Vec::with_capacity(self.variant_count());
        for &flip_ud in options(self.flip_ud) {
            for &flip_lr in options(self.flip_lr) {
                for &rotation in options(self.rotation) {
                    for &color_shift in options(self.color_shift_runs) {
                        variants.push(TtaVariant {
                            flip_ud,
                            flip_lr,
                            rotation,
                            color_shift,
                        });
                    }
                }
            }
        }
        variants
    }
}

/// How predictions from augmented passes are combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtaAggregatorConfig {
    pub method: AggregationMethod,
    pub nthreads: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    Mean,
    /// Geometric mean.
    Gmean,
    Max,
    Min,
}

impl AggregationMethod {
    pub const ALL: [AggregationMethod; 4] = [
        AggregationMethod::Mean,
        AggregationMethod::Gmean,
        AggregationMethod::Max,
        AggregationMethod::Min,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMethod::Mean => "mean",
            AggregationMethod::Gmean => "gmean",
            AggregationMethod::Max => "max",
            AggregationMethod::Min => "min",
        }
    }
}

impl fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AggregationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown aggregation method '{}', {}",
                    s,
                    expected_one_of(&Self::ALL)
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn all_enabled() -> TtaGeneratorConfig {
        TtaGeneratorConfig {
            flip_ud: true,
            flip_lr: true,
            rotation: true,
            color_shift_runs: true,
        }
    }

    #[test]
    fn test_all_toggles_give_sixteen_variants() {
        let config = all_enabled();
        assert_eq!(config.variant_count(), 16);

        let variants = config.variants();
        assert_eq!(variants.len(), 16);
        let unique: HashSet<_> = variants
            .iter()
            .map(|v| (v.flip_ud, v.flip_lr, v.rotation, v.color_shift))
            .collect();
        assert_eq!(unique.len(), 16);
        assert_eq!(variants[0], TtaVariant::default());
    }

    #[test]
    fn test_default_policy() {
        let config = TtaGeneratorConfig::default();
        assert_eq!(config.enabled_count(), 3);
        assert_eq!(config.variant_count(), 8);
        assert!(config.variants().iter().all(|v| !v.color_shift));
    }

    #[test]
    fn test_toggles_are_independent() {
        let config = TtaGeneratorConfig {
            flip_ud: false,
            flip_lr: true,
            rotation: false,
            color_shift_runs: false,
        };
        let variants = config.variants();
        assert_eq!(variants.len(), 2);
        assert!(variants.iter().all(|v| !v.flip_ud && !v.rotation));
        assert!(variants.iter().any(|v| v.flip_lr));
    }

    #[test]
    fn test_nothing_enabled_is_identity_only() {
        let config = TtaGeneratorConfig {
            flip_ud: false,
            flip_lr: false,
            rotation: false,
            color_shift_runs: false,
        };
        assert_eq!(config.variants(), vec![TtaVariant::default()]);
    }

    #[test]
    fn test_aggregation_parse() {
        assert_eq!(
            "gmean".parse::<AggregationMethod>().unwrap(),
            AggregationMethod::Gmean
        );
        assert!("median".parse::<AggregationMethod>().is_err());
    }
}
