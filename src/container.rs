//! WAV container boundary. Only mono 16-bit integer PCM is accepted; the core
//! works on the raw little-endian frame bytes this module hands out.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AugmentError, Result};

/// Container format parameters, passed through unchanged apart from
/// `frame_rate` and `frame_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerParams {
    pub channels: u16,
    pub sample_width: u16,
    pub frame_rate: u32,
    pub frame_count: u32,
    pub compression_type: String,
    pub compression_name: String,
}

impl Default for ContainerParams {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_width: 2,
            frame_rate: 16000,
            frame_count: 0,
            compression_type: "NONE".to_string(),
            compression_name: "not compressed".to_string(),
        }
    }
}

impl ContainerParams {
    pub fn with_frame_count(&self, frame_count: u32) -> Self {
        Self {
            frame_count,
            ..self.clone()
        }
    }

    fn check_supported(&self) -> Result<()> {
        if self.channels != 1 {
            return Err(AugmentError::UnsupportedFormat(format!(
                "expected 1 channel, found {}",
                self.channels
            )));
        }
        if self.sample_width != 2 {
            return Err(AugmentError::UnsupportedFormat(format!(
                "expected 2-byte samples, found {}",
                self.sample_width
            )));
        }
        Ok(())
    }

    fn to_spec(&self) -> WavSpec {
        WavSpec {
            channels: self.channels,
            sample_rate: self.frame_rate,
            bits_per_sample: self.sample_width * 8,
            sample_format: SampleFormat::Int,
        }
    }
}

/// An opened WAV file whose format has already been validated.
pub struct WavContainer {
    reader: WavReader<BufReader<File>>,
    params: ContainerParams,
}

impl WavContainer {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("Opening WAV file {}", path.as_ref().display());
        let reader = WavReader::open(path)?;
        let spec = reader.spec();
        if spec.sample_format != SampleFormat::Int {
            return Err(AugmentError::UnsupportedFormat(format!(
                "expected integer PCM, found {:?}",
                spec.sample_format
            )));
        }
        if spec.bits_per_sample != 16 {
            return Err(AugmentError::UnsupportedFormat(format!(
                "expected 16 bits per sample, found {}",
                spec.bits_per_sample
            )));
        }
        let params = ContainerParams {
            channels: spec.channels,
            sample_width: spec.bits_per_sample / 8,
            frame_rate: spec.sample_rate,
            frame_count: reader.duration(),
            ..ContainerParams::default()
        };
        params.check_supported()?;
        Ok(Self { reader, params })
    }

    pub fn read_params(&self) -> &ContainerParams {
        &self.params
    }

    /// Consume the reader and return every frame as little-endian bytes.
    pub fn read_all_frames(mut self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.params.frame_count as usize * 2);
        for sample in self.reader.samples::<i16>() {
            bytes.extend_from_slice(&sample?.to_le_bytes());
        }
        debug!("Read {} frames", bytes.len() / 2);
        Ok(bytes)
    }
}

/// Write `bytes` (little-endian 16-bit frames) to a new WAV file.
pub fn write<P: AsRef<Path>>(path: P, params: &ContainerParams, bytes: &[u8]) -> Result<()> {
    params.check_supported()?;
    if bytes.len() % 2 != 0 {
        return Err(AugmentError::MalformedInput { len: bytes.len() });
    }
    debug!("Writing WAV file to {}", path.as_ref().display());
    let mut writer = WavWriter::create(path, params.to_spec())?;
    for pair in bytes.chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
    }
    writer.finalize()?;
    Ok(())
}
