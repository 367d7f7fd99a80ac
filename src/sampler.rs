//! Randomized factor selection.
//!
//! Factors live on a decimal grid (`k / 10^decimals`), which keeps the set of
//! candidate values finite and makes "no duplicates within a batch" exact.

use std::collections::HashSet;

use rand::Rng;

use crate::error::{AugmentError, Result};
use crate::gain::WobbleSegment;

pub const DEFAULT_DECIMALS: u32 = 4;
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;
pub const DEFAULT_SPEED_RANGE: (f64, f64) = (0.80, 1.20);

// Absorbs representation error when mapping range bounds onto the grid.
const GRID_TOLERANCE: f64 = 1e-6;

/// Half-open amplitude factor range for a given peak ratio. Louder inputs get
/// smaller factors so the augmented peak mostly stays representable.
pub fn amplitude_range(peak_ratio: f64) -> (f64, f64) {
    if peak_ratio < 0.33 {
        (1.0039, 3.0)
    } else if peak_ratio < 0.66 {
        (0.5, 1.5)
    } else {
        (0.3346, 1.0)
    }
}

pub struct FactorSampler<R> {
    rng: R,
    decimals: u32,
    max_attempts: usize,
    speed_range: (f64, f64),
}

impl<R: Rng> FactorSampler<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            decimals: DEFAULT_DECIMALS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            speed_range: DEFAULT_SPEED_RANGE,
        }
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_speed_range(mut self, low: f64, high: f64) -> Self {
        self.speed_range = (low, high);
        self
    }

    fn scale(&self) -> f64 {
        10f64.powi(self.decimals as i32)
    }

    /// Map `[low, high)` onto grid indices `[lo, hi)`.
    fn grid(&self, low: f64, high: f64) -> Result<(u64, u64)> {
        if !(low.is_finite() && high.is_finite() && low > 0.0 && high > low) {
            return Err(AugmentError::InvalidRange { low, high });
        }
        let scale = self.scale();
        let lo = (low * scale - GRID_TOLERANCE).ceil() as u64;
        let hi = (high * scale - GRID_TOLERANCE).ceil() as u64;
        if lo == 0 || hi <= lo {
            return Err(AugmentError::InvalidRange { low, high });
        }
        Ok((lo, hi))
    }

    /// Draw `count` distinct grid indices from `[lo, hi)`.
    fn unique_indices(&mut self, lo: u64, hi: u64, count: usize) -> Result<Vec<u64>> {
        let available = hi - lo;
        if count as u64 > available {
            return Err(AugmentError::DomainExhausted {
                requested: count,
                available,
            });
        }

        let mut seen = HashSet::with_capacity(count);
        let mut picked = Vec::with_capacity(count);
        while picked.len() < count {
            let mut fresh = None;
            for _ in 0..self.max_attempts {
                let k = self.rng.random_range(lo..hi);
                if seen.insert(k) {
                    fresh = Some(k);
                    break;
                }
            }
            match fresh {
                Some(k) => picked.push(k),
                None => {
                    return Err(AugmentError::SamplerExhausted {
                        attempts: self.max_attempts,
                    })
                }
            }
        }
        Ok(picked)
    }

    /// Draw `count` pairwise-distinct factors from `[low, high)`.
    pub fn unique_factors(&mut self, low: f64, high: f64, count: usize) -> Result<Vec<f64>> {
        let (lo, hi) = self.grid(low, high)?;
        let scale = self.scale();
        Ok(self
            .unique_indices(lo, hi, count)?
            .into_iter()
            .map(|k| k as f64 / scale)
            .collect())
    }

    pub fn amplitude_factor(&mut self, peak_ratio: f64) -> Result<f64> {
        let (low, high) = amplitude_range(peak_ratio);
        Ok(self.unique_factors(low, high, 1)?[0])
    }

    pub fn amplitude_factors(&mut self, peak_ratio: f64, count: usize) -> Result<Vec<f64>> {
        let (low, high) = amplitude_range(peak_ratio);
        self.unique_factors(low, high, count)
    }

    pub fn speed_factor(&mut self) -> Result<f64> {
        Ok(self.speed_factors(1)?[0])
    }

    pub fn speed_factors(&mut self, count: usize) -> Result<Vec<f64>> {
        let (low, high) = self.speed_range;
        self.unique_factors(low, high, count)
    }

    /// Random wobble schedule: `segments` distinct amplitude factors for the
    /// peak ratio, with positive durations that sum to 1.0.
    pub fn wobble_schedule(&mut self, peak_ratio: f64, segments: usize) -> Result<Vec<WobbleSegment>> {
        if segments == 0 {
            return Err(AugmentError::EmptySchedule);
        }
        let factors = self.amplitude_factors(peak_ratio, segments)?;

        let whole = self.scale() as u64;
        let mut cuts = self.unique_indices(1, whole, segments - 1)?;
        cuts.sort_unstable();
        cuts.push(whole);

        let mut previous = 0u64;
        let mut schedule = Vec::with_capacity(segments);
        for (factor, cut) in factors.into_iter().zip(cuts) {
            schedule.push(WobbleSegment::new(factor, (cut - previous) as f64 / whole as f64));
            previous = cut;
        }
        Ok(schedule)
    }
}
