use serde::{Deserialize, Serialize};

use crate::codec::CLIP_LIMIT;
use crate::error::{AugmentError, Result};

// Slack for float error in cumulative durations: sums this close to 1.0 cover
// the whole sequence, and segment boundaries are nudged up by it before flooring.
const DURATION_EPSILON: f64 = 1e-9;

/// One entry of a wobble schedule: scale by `factor` over `duration` of the
/// total length (a fraction in (0, 1]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WobbleSegment {
    pub factor: f64,
    pub duration: f64,
}

impl WobbleSegment {
    pub fn new(factor: f64, duration: f64) -> Self {
        Self { factor, duration }
    }
}

pub(crate) fn check_factor(factor: f64) -> Result<()> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(AugmentError::InvalidFactor(factor))
    }
}

/// Clamp to the symmetric range [-(2^15-1), 2^15-1].
pub fn saturate(value: f64) -> i32 {
    let limit = CLIP_LIMIT as f64;
    value.clamp(-limit, limit) as i32
}

#[inline]
fn scale_sample(sample: i32, factor: f64) -> i32 {
    saturate((sample as f64 * factor).trunc())
}

/// Scale every sample by `factor`, truncating toward zero and saturating
/// just inside the 16-bit boundary.
pub fn scale(samples: &[i32], factor: f64) -> Result<Vec<i32>> {
    check_factor(factor)?;
    let mut out = Vec::with_capacity(samples.len());
    for &s in samples {
        out.push(scale_sample(s, factor));
    }
    Ok(out)
}

/// Apply a piecewise amplitude change.
///
/// Segment boundaries sit at `floor(cumulative_duration * len)`. A segment
/// that would push the cumulative duration past 1.0 is clipped to the
/// remainder and every later entry is ignored. If the schedule stops short
/// of 1.0 the leftover tail takes the last applied factor, so the output
/// always has the input's length.
///
/// Every entry is validated up front, including entries that truncation
/// would later discard, so a bad factor or duration anywhere in the
/// schedule rejects it before any sample is touched.
pub fn wobble(samples: &[i32], schedule: &[WobbleSegment]) -> Result<Vec<i32>> {
    if schedule.is_empty() {
        return Err(AugmentError::EmptySchedule);
    }
    for segment in schedule {
        check_factor(segment.factor)?;
        if !(segment.duration.is_finite() && segment.duration > 0.0 && segment.duration <= 1.0) {
            return Err(AugmentError::InvalidDuration(segment.duration));
        }
    }

    let len = samples.len();
    let mut out = Vec::with_capacity(len);
    let mut allotted = 0.0f64;
    let mut start = 0usize;
    let mut last_factor = schedule[0].factor;

    for segment in schedule {
        if allotted >= 1.0 - DURATION_EPSILON {
            break;
        }
        allotted += segment.duration.min(1.0 - allotted);
        let end = if allotted >= 1.0 - DURATION_EPSILON {
            len
        } else {
            let boundary = allotted * len as f64 + DURATION_EPSILON * len as f64;
            (boundary.floor() as usize).clamp(start, len)
        };
        out.extend(samples[start..end].iter().map(|&s| scale_sample(s, segment.factor)));
        start = end;
        last_factor = segment.factor;
    }

    out.extend(samples[start..].iter().map(|&s| scale_sample(s, last_factor)));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{SAMPLE_MAX, SAMPLE_MIN};

    #[test]
    fn scale_doubles_and_clamps() {
        let input = vec![0, 16384, -16384, 32767];
        let output = scale(&input, 2.0).unwrap();
        assert_eq!(output, vec![0, 32767, -32767, 32767]);
    }

    #[test]
    fn scale_identity_keeps_in_range_samples() {
        let input: Vec<i32> = (-CLIP_LIMIT..=CLIP_LIMIT).step_by(97).collect();
        assert_eq!(scale(&input, 1.0).unwrap(), input);
    }

    #[test]
    fn scale_identity_pulls_minimum_inside_clip_limit() {
        assert_eq!(scale(&[SAMPLE_MIN], 1.0).unwrap(), vec![-CLIP_LIMIT]);
    }

    #[test]
    fn scale_truncates_toward_zero() {
        let output = scale(&[3, -3, 5, -5], 0.5).unwrap();
        assert_eq!(output, vec![1, -1, 2, -2]);
    }

    #[test]
    fn scale_saturates_with_matching_sign() {
        let input = vec![20000, -20000, 16384, -16384];
        let output = scale(&input, 1.7).unwrap();
        for (i, (&s, &o)) in input.iter().zip(&output).enumerate() {
            if (s as f64 * 1.7).abs() >= 32768.0 {
                assert_eq!(o, CLIP_LIMIT * s.signum(), "sample {} should saturate", i);
            }
            assert!(o.abs() <= CLIP_LIMIT, "sample {} escaped clip limit: {}", i, o);
        }
    }

    #[test]
    fn scale_does_not_touch_input() {
        let input = vec![1000, -1000];
        let _ = scale(&input, 3.0).unwrap();
        assert_eq!(input, vec![1000, -1000]);
    }

    #[test]
    fn scale_rejects_bad_factors() {
        for f in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(scale(&[1, 2], f), Err(AugmentError::InvalidFactor(_))),
                "factor {} should be rejected",
                f
            );
        }
    }

    #[test]
    fn wobble_two_halves() {
        let input = vec![20000, -20000, 100, -100, 20000, -20000, 100, -101];
        let schedule = [WobbleSegment::new(2.0, 0.5), WobbleSegment::new(0.5, 0.5)];
        let output = wobble(&input, &schedule).unwrap();
        assert_eq!(
            output,
            vec![SAMPLE_MAX, -SAMPLE_MAX, 200, -200, 10000, -10000, 50, -50]
        );
    }

    #[test]
    fn wobble_covers_whole_sequence() {
        let input: Vec<i32> = (0..1001).collect();
        let schedule = [
            WobbleSegment::new(1.0, 0.1),
            WobbleSegment::new(1.0, 0.2),
            WobbleSegment::new(1.0, 0.3),
            WobbleSegment::new(1.0, 0.4),
        ];
        let output = wobble(&input, &schedule).unwrap();
        assert_eq!(output, input, "identity factors should reproduce the input");
    }

    #[test]
    fn wobble_truncates_overshooting_schedule() {
        let input = vec![100; 10];
        let schedule = [
            WobbleSegment::new(2.0, 0.6),
            WobbleSegment::new(3.0, 0.6),
            WobbleSegment::new(5.0, 0.5),
        ];
        let output = wobble(&input, &schedule).unwrap();
        assert_eq!(output.len(), input.len());
        assert_eq!(&output[..6], &[200; 6]);
        assert_eq!(&output[6..], &[300; 4], "third entry must be discarded");
    }

    #[test]
    fn wobble_boundary_survives_rounding_in_cumulative_sum() {
        let input = vec![100; 10];
        let schedule = [
            WobbleSegment::new(1.0, 0.1),
            WobbleSegment::new(2.0, 0.7),
            WobbleSegment::new(3.0, 0.2),
        ];
        let output = wobble(&input, &schedule).unwrap();
        assert_eq!(&output[..1], &[100]);
        assert_eq!(&output[1..8], &[200; 7], "middle segment should cover 7 samples");
        assert_eq!(&output[8..], &[300; 2]);
    }

    #[test]
    fn wobble_rejects_bad_entry_past_truncation_point() {
        let schedule = [WobbleSegment::new(2.0, 1.0), WobbleSegment::new(0.0, 0.5)];
        assert!(matches!(
            wobble(&[1, 2], &schedule),
            Err(AugmentError::InvalidFactor(_))
        ));
    }

    #[test]
    fn wobble_short_schedule_extends_last_factor() {
        let input = vec![100; 10];
        let schedule = [WobbleSegment::new(2.0, 0.3), WobbleSegment::new(3.0, 0.2)];
        let output = wobble(&input, &schedule).unwrap();
        assert_eq!(&output[..3], &[200; 3]);
        assert_eq!(&output[3..], &[300; 7]);
    }

    #[test]
    fn wobble_empty_sequence() {
        let schedule = [WobbleSegment::new(2.0, 1.0)];
        assert!(wobble(&[], &schedule).unwrap().is_empty());
    }

    #[test]
    fn wobble_validates_schedule() {
        assert!(matches!(wobble(&[1], &[]), Err(AugmentError::EmptySchedule)));
        assert!(matches!(
            wobble(&[1], &[WobbleSegment::new(0.0, 1.0)]),
            Err(AugmentError::InvalidFactor(_))
        ));
        assert!(matches!(
            wobble(&[1], &[WobbleSegment::new(1.0, 0.0)]),
            Err(AugmentError::InvalidDuration(_))
        ));
        assert!(matches!(
            wobble(&[1], &[WobbleSegment::new(1.0, 1.5)]),
            Err(AugmentError::InvalidDuration(_))
        ));
    }

    #[test]
    fn saturate_bounds() {
        assert_eq!(saturate(1e9), CLIP_LIMIT);
        assert_eq!(saturate(-1e9), -CLIP_LIMIT);
        assert_eq!(saturate(-32768.0), -CLIP_LIMIT);
        assert_eq!(saturate(42.0), 42);
    }
}
