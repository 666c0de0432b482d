use serde::{Deserialize, Serialize};

use analyzer::config::N_FEATURES;
use classifier::Prediction;

/// Wire format of a successful `/analyze` reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub filename: String,
    pub label: String,
    pub confidence: f32,
    pub probabilities: Vec<f32>,
    pub feature_count: usize,
    pub spectrogram: String,
}

impl AnalyzeResponse {
    #[must_use]
    pub fn new(filename: String, prediction: Prediction, spectrogram: String) -> Self {
        Self {
            filename,
            label: prediction.label.name().to_string(),
            confidence: round4(prediction.confidence),
            probabilities: prediction.probabilities,
            feature_count: N_FEATURES,
            spectrogram,
        }
    }

    /// Degraded reply when the clip could not be decoded at all.
    #[must_use]
    pub fn unreadable(filename: String) -> Self {
        Self::new(filename, Prediction::unknown(), String::new())
    }
}

fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}
