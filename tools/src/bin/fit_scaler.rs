use std::path::{Path, PathBuf};

use clap::Parser;
use rayon::prelude::*;

use analyzer::{FeatureScaler, FeatureVector};
use codec::SAMPLE_RATE;

/// Fits feature normalization statistics from a labeled dataset.
///
/// Walks the `real/` and `fake/` subdirectories for WAV clips, runs the
/// same normalization and feature extraction as the service, and persists
/// the per-dimension mean and standard deviation as JSON. Run offline when
/// the model is retrained; the service itself never invokes this.
#[derive(Debug, Parser)]
struct Args {
    /// Dataset root containing `real/` and `fake/` subdirectories.
    dataset: PathBuf,

    /// File to write the fitted statistics to.
    #[arg(long, short, default_value = "scaler.json")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let files = collect_wavs(&args.dataset)?;
    anyhow::ensure!(
        !files.is_empty(),
        "no WAV clips under {}",
        args.dataset.display()
    );

    println!("Extracting features from {} clips...", files.len());

    let rows: Vec<FeatureVector> = files
        .par_iter()
        .filter_map(|path| match features_of(path) {
            Ok(row) => Some(row),
            Err(err) => {
                eprintln!("skipping {}: {err:#}", path.display());
                None
            }
        })
        .collect();

    println!("Fitting over {} of {} clips", rows.len(), files.len());

    let scaler = FeatureScaler::fit(&rows)?;
    scaler.to_file(&args.output)?;

    println!("Wrote {}", args.output.display());

    Ok(())
}

fn features_of(path: &Path) -> anyhow::Result<FeatureVector> {
    let samples = codec::load_wav(path, SAMPLE_RATE)?;
    let samples = codec::pad_or_truncate(samples);
    Ok(analyzer::extract_features(&samples, SAMPLE_RATE)?)
}

fn collect_wavs(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for class in ["real", "fake"] {
        let dir = root.join(class);
        if !dir.is_dir() {
            continue;
        }
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
            {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}
