use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AugmentError, Result};
use crate::sampler::{DEFAULT_DECIMALS, DEFAULT_MAX_ATTEMPTS, DEFAULT_SPEED_RANGE};
use crate::speed::{Interpolation, SpeedStrategy};

/// Knobs for one augmentation run. Every field has a default, so a config
/// file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    pub amplitude_variants: usize,
    pub wobble_variants: usize,
    pub wobble_segments: usize,
    pub speed_variants: usize,
    /// Half-open `[low, high)` range for speed factors.
    pub speed_range: [f64; 2],
    pub speed_strategy: SpeedStrategy,
    pub interpolation: Interpolation,
    pub factor_decimals: u32,
    pub max_attempts: usize,
    /// Recognized container extensions, compared case-insensitively.
    pub extensions: Vec<String>,
    pub seed: Option<u64>,
    pub verbose: bool,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            amplitude_variants: 3,
            wobble_variants: 2,
            wobble_segments: 4,
            speed_variants: 3,
            speed_range: [DEFAULT_SPEED_RANGE.0, DEFAULT_SPEED_RANGE.1],
            speed_strategy: SpeedStrategy::Resample,
            interpolation: Interpolation::Linear,
            factor_decimals: DEFAULT_DECIMALS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            extensions: vec!["wav".to_string()],
            seed: None,
            verbose: false,
        }
    }
}

impl AugmentConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        let [low, high] = self.speed_range;
        if !(low.is_finite() && high.is_finite() && low > 0.0 && high > low) {
            return Err(AugmentError::InvalidRange { low, high });
        }
        if self.wobble_variants > 0 && self.wobble_segments == 0 {
            return Err(AugmentError::EmptySchedule);
        }
        Ok(())
    }

    /// True when `path` ends in one of the configured extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}
