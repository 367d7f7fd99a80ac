//! Batch driver: discovery, per-file augmentation and output naming.
//!
//! Each input `<stem>.<ext>` produces `<stem>0.<ext>`, `<stem>1.<ext>`, ...
//! with one counter running through amplitude, wobble and speed variants in
//! that order. A skipped variant still consumes its number.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info, warn};

use crate::codec::{decode, encode, peak_ratio};
use crate::config::AugmentConfig;
use crate::container::{self, ContainerParams, WavContainer};
use crate::error::AugmentError;
use crate::gain::{scale, wobble};
use crate::sampler::FactorSampler;
use crate::speed::change_speed;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchReport {
    pub processed: usize,
    pub written: usize,
    pub skipped_variants: usize,
    pub failed: Vec<(PathBuf, String)>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FileOutcome {
    pub written: usize,
    pub skipped: usize,
}

/// Candidate files in `input_dir` (non-recursive), sorted by name.
pub fn discover(input_dir: &Path, config: &AugmentConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(input_dir)
        .with_context(|| format!("failed to list {}", input_dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && config.accepts(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn variant_path(output_dir: &Path, stem: &str, index: usize, ext: &str) -> PathBuf {
    output_dir.join(format!("{}{}.{}", stem, index, ext))
}

/// Encode and write one variant. Returns `false` when the samples fail the
/// range check, in which case nothing is written.
pub fn emit_variant(path: &Path, params: &ContainerParams, samples: &[i32]) -> Result<bool> {
    let bytes = match encode(samples) {
        Ok(bytes) => bytes,
        Err(AugmentError::EncodingRange { index, value }) => {
            error!(
                "Skipping {}: sample {} at index {} is out of range",
                path.display(),
                value,
                index
            );
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };
    let params = params.with_frame_count(samples.len() as u32);
    container::write(path, &params, &bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

/// Run every configured augmentation on one file.
pub fn augment_file<R: Rng>(
    path: &Path,
    output_dir: &Path,
    config: &AugmentConfig,
    sampler: &mut FactorSampler<R>,
) -> Result<FileOutcome> {
    let source = WavContainer::open(path)?;
    let params = source.read_params().clone();
    let samples = decode(&source.read_all_frames()?)?;
    let ratio = peak_ratio(&samples);
    debug!(
        "{}: {} frames at {} Hz, peak ratio {:.4}",
        path.display(),
        samples.len(),
        params.frame_rate,
        ratio
    );

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wav".to_string());

    // Draw every factor and build every variant before touching the output
    // directory, so a sampling failure leaves nothing behind.
    let mut variants: Vec<(String, ContainerParams, Vec<i32>)> = Vec::new();
    for factor in sampler.amplitude_factors(ratio, config.amplitude_variants)? {
        variants.push((format!("amplitude x{}", factor), params.clone(), scale(&samples, factor)?));
    }
    for _ in 0..config.wobble_variants {
        let schedule = sampler.wobble_schedule(ratio, config.wobble_segments)?;
        let out = wobble(&samples, &schedule)?;
        variants.push((format!("wobble {:?}", schedule), params.clone(), out));
    }
    for factor in sampler.speed_factors(config.speed_variants)? {
        let (out, out_params) = change_speed(
            &samples,
            &params,
            factor,
            config.speed_strategy,
            config.interpolation,
        )?;
        let label = format!("speed x{} ({:?})", factor, config.speed_strategy);
        variants.push((label, out_params, out));
    }

    let mut outcome = FileOutcome::default();
    let mut written = Vec::new();
    for (counter, (label, out_params, out)) in variants.iter().enumerate() {
        let target = variant_path(output_dir, &stem, counter, &ext);
        debug!("{} -> {}", label, target.display());
        match emit_variant(&target, out_params, out) {
            Ok(true) => {
                outcome.written += 1;
                written.push(target);
            }
            Ok(false) => outcome.skipped += 1,
            Err(e) => {
                for partial in &written {
                    let _ = fs::remove_file(partial);
                }
                let _ = fs::remove_file(&target);
                return Err(e);
            }
        }
    }

    Ok(outcome)
}

pub fn build_sampler(config: &AugmentConfig) -> FactorSampler<StdRng> {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    FactorSampler::new(rng)
        .with_decimals(config.factor_decimals)
        .with_max_attempts(config.max_attempts)
        .with_speed_range(config.speed_range[0], config.speed_range[1])
}

/// Augment every recognized file in `input_dir`. A failing file is logged
/// and recorded in the report; it never stops the batch.
pub fn run_batch(input_dir: &Path, output_dir: &Path, config: &AugmentConfig) -> Result<BatchReport> {
    config.validate()?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let files = discover(input_dir, config)?;
    info!("Found {} input files in {}", files.len(), input_dir.display());

    let mut sampler = build_sampler(config);
    let mut report = BatchReport::default();
    for path in files {
        match augment_file(&path, output_dir, config, &mut sampler) {
            Ok(outcome) => {
                info!(
                    "{}: wrote {} variants ({} skipped)",
                    path.display(),
                    outcome.written,
                    outcome.skipped
                );
                report.processed += 1;
                report.written += outcome.written;
                report.skipped_variants += outcome.skipped;
            }
            Err(e) => {
                warn!("{}: {:#}", path.display(), e);
                report.failed.push((path, format!("{:#}", e)));
            }
        }
    }
    Ok(report)
}
