//! Waveform augmentation for mono 16-bit PCM audio: amplitude scaling,
//! segmented "wobble" scaling and speed changes, plus a WAV batch driver.

pub mod batch;
pub mod codec;
pub mod config;
pub mod container;
pub mod error;
pub mod gain;
pub mod sampler;
pub mod speed;

pub use codec::{decode, encode, peak_ratio};
pub use config::AugmentConfig;
pub use container::ContainerParams;
pub use error::{AugmentError, Result};
pub use gain::{scale, wobble, WobbleSegment};
pub use sampler::FactorSampler;
pub use speed::{change_speed, reinterpret_rate, resample, Interpolation, SpeedStrategy};
