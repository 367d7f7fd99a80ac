//! Playback speed changes.
//!
//! `resample` rebuilds the sample sequence at a new length and keeps the
//! frame rate, so duration changes while pitch is preserved only as far as the
//! interpolation allows. `reinterpret_rate` keeps every sample and rewrites the
//! container frame rate instead, which shifts pitch together with duration.
//! The two produce different audio and are not interchangeable.

use serde::{Deserialize, Serialize};

use crate::container::ContainerParams;
use crate::error::{AugmentError, Result};
use crate::gain::{check_factor, saturate};

/// Longest sequence `resample` will build; the WAV frame count is a u32.
pub const MAX_RESAMPLED_LEN: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Nearest,
    #[default]
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedStrategy {
    #[default]
    Resample,
    ReinterpretRate,
}

/// Resample to `ceil(len / factor)` samples over the original timeline.
pub fn resample(samples: &[i32], factor: f64, interpolation: Interpolation) -> Result<Vec<i32>> {
    check_factor(factor)?;
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let length = (samples.len() as f64 / factor).ceil();
    if !length.is_finite() || length > MAX_RESAMPLED_LEN as f64 {
        return Err(AugmentError::LengthOverflow { factor, length });
    }
    let new_len = length as usize;
    let last = samples.len() - 1;
    let mut out = Vec::with_capacity(new_len);
    for i in 0..new_len {
        let pos = i as f64 * factor;
        let value = match interpolation {
            Interpolation::Nearest => samples[(pos.round() as usize).min(last)] as f64,
            Interpolation::Linear => {
                let idx = (pos.floor() as usize).min(last);
                let frac = pos - idx as f64;
                let a = samples[idx] as f64;
                let b = samples[(idx + 1).min(last)] as f64;
                a + (b - a) * frac
            }
        };
        out.push(saturate(value.trunc()));
    }
    Ok(out)
}

/// Multiply the container frame rate by `factor`, leaving the samples alone.
pub fn reinterpret_rate(params: &ContainerParams, factor: f64) -> Result<ContainerParams> {
    check_factor(factor)?;
    let rate = (params.frame_rate as f64 * factor).round();
    if rate < 1.0 || rate > u32::MAX as f64 {
        return Err(AugmentError::InvalidFactor(factor));
    }
    Ok(ContainerParams {
        frame_rate: rate as u32,
        ..params.clone()
    })
}

/// Apply `strategy` and return the new samples with updated container params.
pub fn change_speed(
    samples: &[i32],
    params: &ContainerParams,
    factor: f64,
    strategy: SpeedStrategy,
    interpolation: Interpolation,
) -> Result<(Vec<i32>, ContainerParams)> {
    match strategy {
        SpeedStrategy::Resample => {
            let out = resample(samples, factor, interpolation)?;
            let params = params.with_frame_count(out.len() as u32);
            Ok((out, params))
        }
        SpeedStrategy::ReinterpretRate => {
            let params = reinterpret_rate(params, factor)?;
            Ok((samples.to_vec(), params))
        }
    }
}
