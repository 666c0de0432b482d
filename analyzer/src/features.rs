use ndarray::Array1;
use thiserror::Error;

use crate::chroma;
use crate::config::{HOP_LENGTH, N_FEATURES, N_FFT, ROLLOFF_PERCENT};
use crate::mfcc;
use crate::stft::{frame_count, Stft};

/// Raw (unscaled) 26-element feature vector.
pub type FeatureVector = Array1<f32>;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("empty audio input")]
    EmptyInput,
    #[error("non-finite sample values in input")]
    NonFinite,
}

/// Computes the fixed-order acoustic feature vector: chroma mean, RMS mean,
/// spectral centroid/bandwidth/rolloff means, zero-crossing-rate mean, and
/// the means of the first 20 MFCCs.
///
/// Always yields exactly [`N_FEATURES`] values for non-empty input.
pub fn extract_features(samples: &[f32], sample_rate: u32) -> Result<FeatureVector, FeatureError> {
    if samples.is_empty() {
        return Err(FeatureError::EmptyInput);
    }
    if samples.iter().any(|s| !s.is_finite()) {
        return Err(FeatureError::NonFinite);
    }

    let samples = peak_normalize(samples);
    let magnitudes = Stft::new().magnitudes(&samples);

    let mut features = Vec::with_capacity(N_FEATURES);
    features.push(chroma::chroma_mean(&magnitudes, sample_rate));
    features.push(mean(&frame_rms(&samples)));
    features.push(mean(&spectral_centroids(&magnitudes, sample_rate)));
    features.push(mean(&spectral_bandwidths(&magnitudes, sample_rate)));
    features.push(mean(&spectral_rolloffs(&magnitudes, sample_rate)));
    features.push(mean(&zero_crossing_rates(&samples)));
    features.extend(mfcc::calculate(&magnitudes, sample_rate));

    debug_assert_eq!(features.len(), N_FEATURES);
    Ok(Array1::from_vec(features))
}

fn peak_normalize(samples: &[f32]) -> Vec<f32> {
    let peak = samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
    if peak > 0.0 {
        samples.iter().map(|s| s / peak).collect()
    } else {
        samples.to_vec()
    }
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}

/// Root-mean-square energy per analysis frame.
fn frame_rms(samples: &[f32]) -> Vec<f32> {
    (0..frame_count(samples.len()))
        .map(|index| {
            let start = index * HOP_LENGTH;
            let energy: f32 = (0..N_FFT)
                .map(|i| {
                    let s = samples.get(start + i).copied().unwrap_or(0.0);
                    s * s
                })
                .sum();
            (energy / N_FFT as f32).sqrt()
        })
        .collect()
}

fn bin_frequencies(sample_rate: u32) -> Vec<f32> {
    (0..=N_FFT / 2)
        .map(|bin| bin as f32 * sample_rate as f32 / N_FFT as f32)
        .collect()
}

/// Magnitude-weighted mean frequency per frame, in Hz.
fn spectral_centroids(magnitudes: &[Vec<f32>], sample_rate: u32) -> Vec<f32> {
    let freqs = bin_frequencies(sample_rate);
    magnitudes
        .iter()
        .map(|frame| {
            let total: f32 = frame.iter().sum();
            if total <= f32::EPSILON {
                return 0.0;
            }
            frame
                .iter()
                .zip(&freqs)
                .map(|(m, f)| m * f)
                .sum::<f32>()
                / total
        })
        .collect()
}

/// Magnitude-weighted standard deviation around the centroid, in Hz.
fn spectral_bandwidths(magnitudes: &[Vec<f32>], sample_rate: u32) -> Vec<f32> {
    let freqs = bin_frequencies(sample_rate);
    magnitudes
        .iter()
        .map(|frame| {
            let total: f32 = frame.iter().sum();
            if total <= f32::EPSILON {
                return 0.0;
            }
            let centroid = frame
                .iter()
                .zip(&freqs)
                .map(|(m, f)| m * f)
                .sum::<f32>()
                / total;
            let variance = frame
                .iter()
                .zip(&freqs)
                .map(|(m, f)| m * (f - centroid).powi(2))
                .sum::<f32>()
                / total;
            variance.sqrt()
        })
        .collect()
}

/// Frequency below which [`ROLLOFF_PERCENT`] of the spectral energy sits.
fn spectral_rolloffs(magnitudes: &[Vec<f32>], sample_rate: u32) -> Vec<f32> {
    let freqs = bin_frequencies(sample_rate);
    magnitudes
        .iter()
        .map(|frame| {
            let total: f32 = frame.iter().sum();
            if total <= f32::EPSILON {
                return 0.0;
            }
            let threshold = ROLLOFF_PERCENT * total;
            let mut cumulative = 0.0;
            for (m, &f) in frame.iter().zip(&freqs) {
                cumulative += m;
                if cumulative >= threshold {
                    return f;
                }
            }
            *freqs.last().unwrap_or(&0.0)
        })
        .collect()
}

/// Fraction of sign changes per analysis frame.
fn zero_crossing_rates(samples: &[f32]) -> Vec<f32> {
    (0..frame_count(samples.len()))
        .map(|index| {
            let start = index * HOP_LENGTH;
            let mut crossings = 0usize;
            for i in 1..N_FFT {
                let a = samples.get(start + i - 1).copied().unwrap_or(0.0);
                let b = samples.get(start + i).copied().unwrap_or(0.0);
                if (a >= 0.0) != (b >= 0.0) {
                    crossings += 1;
                }
            }
            crossings as f32 / N_FFT as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{extract_features, FeatureError};
    use crate::config::N_FEATURES;

    const SAMPLE_RATE: u32 = 16_000;

    fn sine(freq: f32, seconds: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * seconds) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / SAMPLE_RATE as f32).sin())
            .collect()
    }

    #[test]
    fn always_yields_26_features() {
        for seconds in [0.05, 1.0, 3.0, 5.0] {
            let features = extract_features(&sine(440.0, seconds), SAMPLE_RATE).unwrap();
            assert_eq!(features.len(), N_FEATURES, "duration {seconds}s");
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            extract_features(&[], SAMPLE_RATE),
            Err(FeatureError::EmptyInput)
        ));
    }

    #[test]
    fn non_finite_input_is_an_error() {
        assert!(matches!(
            extract_features(&[0.1, f32::NAN, 0.2], SAMPLE_RATE),
            Err(FeatureError::NonFinite)
        ));
    }

    #[test]
    fn silence_yields_finite_features() {
        let features = extract_features(&vec![0.0; 48_000], SAMPLE_RATE).unwrap();
        assert_eq!(features.len(), N_FEATURES);
        assert!(features.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn pure_tone_centroid_is_near_its_frequency() {
        let features = extract_features(&sine(1_000.0, 3.0), SAMPLE_RATE).unwrap();
        let centroid = features[2];
        assert!(
            (500.0..2_000.0).contains(&centroid),
            "centroid {centroid} Hz for a 1 kHz tone"
        );
    }

    #[test]
    fn high_frequency_tone_crosses_zero_more_often() {
        let low = extract_features(&sine(200.0, 1.0), SAMPLE_RATE).unwrap()[5];
        let high = extract_features(&sine(4_000.0, 1.0), SAMPLE_RATE).unwrap()[5];
        assert!(high > low, "zcr {high} should exceed {low}");
    }

    #[test]
    fn amplitude_does_not_change_features() {
        let quiet: Vec<f32> = sine(440.0, 1.0).iter().map(|s| s * 0.05).collect();
        let loud = sine(440.0, 1.0);
        let a = extract_features(&quiet, SAMPLE_RATE).unwrap();
        let b = extract_features(&loud, SAMPLE_RATE).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-3, "{x} vs {y}");
        }
    }
}
