use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use classifier::Data;

use crate::config::N_FEATURES;
use crate::features::FeatureVector;

/// Per-dimension statistics the model was trained with. A mismatch with the
/// training pipeline silently degrades classification quality; it is not
/// detectable at runtime.
const TRAINING_MEAN: [f32; N_FEATURES] = [
    0.17, 0.11, 2074.22, 2604.15, 4748.39, 0.08, //
    -130.81, 43.52, 36.90, 30.92, 25.88, 21.77, //
    18.59, 15.7, 13.37, 11.44, 9.72, 8.30, //
    7.03, 5.95, 5.02, 4.21, 3.52, 2.95, //
    2.46, 2.04,
];

const TRAINING_STD: [f32; N_FEATURES] = [
    0.10, 0.07, 600.2, 620.12, 1052.12, 0.05, //
    10.63, 10.03, 9.77, 9.65, 9.49, 9.42, //
    9.17, 9.01, 8.96, 8.75, 8.59, 8.45, //
    8.21, 8.13, 8.02, 7.85, 7.74, 7.61, //
    7.53, 7.45,
];

#[derive(Debug, Error)]
pub enum ScalerError {
    #[error("expected {expected} statistics, got {got}")]
    Dimension { expected: usize, got: usize },
    #[error("zero standard deviation at index {0}")]
    DegenerateStd(usize),
    #[error("no feature rows to fit")]
    EmptyFit,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Z-score normalization with fixed mean and standard deviation vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    mean: Vec<f32>,
    std: Vec<f32>,
}

impl FeatureScaler {
    pub fn new(mean: Vec<f32>, std: Vec<f32>) -> Result<Self, ScalerError> {
        if mean.len() != N_FEATURES {
            return Err(ScalerError::Dimension {
                expected: N_FEATURES,
                got: mean.len(),
            });
        }
        if std.len() != N_FEATURES {
            return Err(ScalerError::Dimension {
                expected: N_FEATURES,
                got: std.len(),
            });
        }
        if let Some(index) = std.iter().position(|&s| s == 0.0 || !s.is_finite()) {
            return Err(ScalerError::DegenerateStd(index));
        }
        Ok(Self { mean, std })
    }

    /// Scaler matching the statistics used to train the bundled model.
    #[must_use]
    pub fn trained() -> Self {
        Self {
            mean: TRAINING_MEAN.to_vec(),
            std: TRAINING_STD.to_vec(),
        }
    }

    /// Z-scores a raw feature vector into the classifier's (1, N) shape.
    #[must_use]
    pub fn transform(&self, features: &FeatureVector) -> Data {
        debug_assert_eq!(features.len(), self.mean.len());
        let scaled: Vec<f32> = features
            .iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(&x, (&mean, &std))| (x - mean) / std)
            .collect();

        let columns = scaled.len();
        Data::from_shape_vec((1, columns), scaled).expect("row vector shape")
    }

    /// Fits population mean and standard deviation over feature rows, the
    /// offline counterpart of [`FeatureScaler::trained`].
    pub fn fit(rows: &[FeatureVector]) -> Result<Self, ScalerError> {
        if rows.is_empty() {
            return Err(ScalerError::EmptyFit);
        }

        let count = rows.len() as f32;
        let mut mean = vec![0.0f32; N_FEATURES];
        for row in rows {
            if row.len() != N_FEATURES {
                return Err(ScalerError::Dimension {
                    expected: N_FEATURES,
                    got: row.len(),
                });
            }
            for (m, &x) in mean.iter_mut().zip(row.iter()) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= count;
        }

        let mut std = vec![0.0f32; N_FEATURES];
        for row in rows {
            for ((s, &m), &x) in std.iter_mut().zip(&mean).zip(row.iter()) {
                *s += (x - m).powi(2);
            }
        }
        for s in &mut std {
            *s = (*s / count).sqrt();
            // Constant dimensions pass through unscaled.
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        Self::new(mean, std)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ScalerError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScalerError> {
        let reader = BufReader::new(File::open(path)?);
        let scaler: Self = serde_json::from_reader(reader)?;
        Self::new(scaler.mean, scaler.std)
    }
}
