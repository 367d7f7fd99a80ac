use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::{info, Level};

use wav_augment::batch::run_batch;
use wav_augment::AugmentConfig;

const USAGE: &str =
    "usage: wav_augment <input_dir> <output_dir> [--config FILE] [--seed N] [--verbose]";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut positional = Vec::new();
    let mut config_path = None;
    let mut seed = None;
    let mut verbose = false;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => config_path = Some(iter.next().context(USAGE)?.clone()),
            "--seed" => {
                let value = iter.next().context(USAGE)?;
                seed = Some(
                    value
                        .parse::<u64>()
                        .with_context(|| format!("invalid seed '{}'", value))?,
                );
            }
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                return Ok(());
            }
            other if other.starts_with('-') => bail!("unknown flag '{}'\n{}", other, USAGE),
            other => positional.push(PathBuf::from(other)),
        }
    }
    let [input_dir, output_dir] = <[PathBuf; 2]>::try_from(positional)
        .map_err(|_| anyhow::anyhow!(USAGE))?;

    let mut config = match &config_path {
        Some(path) => AugmentConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path))?,
        None => AugmentConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }
    config.verbose |= verbose;

    tracing_subscriber::fmt()
        .with_max_level(if config.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    info!(
        "Augmenting {} -> {}",
        input_dir.display(),
        output_dir.display()
    );
    let report = run_batch(&input_dir, &output_dir, &config)?;

    info!(
        "Done: {} files processed, {} variants written, {} skipped, {} files failed",
        report.processed,
        report.written,
        report.skipped_variants,
        report.failed.len()
    );
    for (path, reason) in &report.failed {
        eprintln!("failed: {}: {}", path.display(), reason);
    }
    Ok(())
}
