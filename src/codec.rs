//! Conversion between little-endian 16-bit PCM bytes and sample sequences.
//!
//! Samples are carried as `i32` so that values pushed out of range by a
//! transform can be detected here instead of wrapping silently.

use crate::error::{AugmentError, Result};

/// Magnitude of the most negative 16-bit sample (2^15).
pub const MAX_SOUND: i32 = 1 << 15;
pub const SAMPLE_MIN: i32 = i16::MIN as i32;
pub const SAMPLE_MAX: i32 = i16::MAX as i32;
/// Symmetric saturation bound used by the transforms.
pub const CLIP_LIMIT: i32 = MAX_SOUND - 1;

const BYTES_PER_SAMPLE: usize = 2;

/// Decode a raw PCM buffer into samples, two bytes per sample.
pub fn decode(bytes: &[u8]) -> Result<Vec<i32>> {
    if bytes.len() % BYTES_PER_SAMPLE != 0 {
        return Err(AugmentError::MalformedInput { len: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as i32)
        .collect())
}

/// Encode samples as little-endian i16.
///
/// The whole sequence is checked before any byte is produced, so an
/// out-of-range sample rejects the call atomically and no partial buffer
/// ever escapes.
pub fn encode(samples: &[i32]) -> Result<Vec<u8>> {
    if let Some((index, &value)) = samples
        .iter()
        .enumerate()
        .find(|&(_, &v)| !(SAMPLE_MIN..=SAMPLE_MAX).contains(&v))
    {
        return Err(AugmentError::EncodingRange { index, value });
    }

    let mut out = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);
    for &s in samples {
        out.extend_from_slice(&(s as i16).to_le_bytes());
    }
    Ok(out)
}

/// Loudest sample magnitude relative to 2^15. Empty input is silent (0.0).
pub fn peak_ratio(samples: &[i32]) -> f64 {
    let peak = samples
        .iter()
        .map(|&s| (s as i64).unsigned_abs())
        .max()
        .unwrap_or(0);
    peak as f64 / MAX_SOUND as f64
}
