use std::f32::consts::PI;

use crate::config::{N_FFT, N_MELS, N_MFCC};

/// Triangular mel filterbank over the positive-frequency spectrum bins.
pub struct MelBank {
    filters: Vec<Vec<f32>>,
}

impl MelBank {
    #[must_use]
    pub fn new(n_mels: usize, sample_rate: u32) -> Self {
        let freq_bins = N_FFT / 2 + 1;
        let mel_min = hz_to_mel(0.0);
        let mel_max = hz_to_mel(sample_rate as f32 / 2.0);

        let mel_points: Vec<f32> = (0..n_mels + 2)
            .map(|i| mel_min + (mel_max - mel_min) * i as f32 / (n_mels + 1) as f32)
            .collect();
        let bin_points: Vec<usize> = mel_points
            .iter()
            .map(|&mel| {
                let hz = mel_to_hz(mel);
                let bin = ((hz / sample_rate as f32) * N_FFT as f32).floor() as usize;
                bin.min(freq_bins - 1)
            })
            .collect();

        let mut filters = vec![vec![0.0f32; freq_bins]; n_mels];
        for m in 1..=n_mels {
            let left = bin_points[m - 1];
            let center = bin_points[m];
            let right = bin_points[m + 1];

            if center > left {
                for k in left..center {
                    filters[m - 1][k] = (k - left) as f32 / (center - left) as f32;
                }
            }
            if right > center {
                for k in center..right {
                    filters[m - 1][k] = (right - k) as f32 / (right - center) as f32;
                }
            }
        }

        Self { filters }
    }

    #[must_use]
    pub fn n_mels(&self) -> usize {
        self.filters.len()
    }

    /// Projects one power-spectrum frame onto the mel bands.
    #[must_use]
    pub fn apply(&self, power: &[f32]) -> Vec<f32> {
        self.filters
            .iter()
            .map(|filter| {
                filter
                    .iter()
                    .zip(power)
                    .map(|(weight, p)| weight * p)
                    .sum()
            })
            .collect()
    }
}

/// Means of the first [`N_MFCC`] cepstral coefficients across frames.
///
/// Coefficients are the orthonormal DCT-II of the log-power mel spectrum.
pub fn calculate(magnitudes: &[Vec<f32>], sample_rate: u32) -> Vec<f32> {
    let bank = MelBank::new(N_MELS, sample_rate);

    let mut sums = vec![0.0f32; N_MFCC];
    let mut frames = 0usize;

    for frame in magnitudes {
        let power: Vec<f32> = frame.iter().map(|m| m * m).collect();
        let mel = bank.apply(&power);
        let log_mel: Vec<f32> = mel.iter().map(|&e| 10.0 * e.max(1e-10).log10()).collect();

        for (sum, coeff) in sums.iter_mut().zip(dct2_ortho(&log_mel, N_MFCC)) {
            *sum += coeff;
        }
        frames += 1;
    }

    if frames > 0 {
        for sum in &mut sums {
            *sum /= frames as f32;
        }
    }
    sums
}

fn dct2_ortho(input: &[f32], coeffs: usize) -> Vec<f32> {
    let n = input.len() as f32;
    (0..coeffs)
        .map(|k| {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            let sum: f32 = input
                .iter()
                .enumerate()
                .map(|(i, &x)| x * (PI * k as f32 * (2 * i + 1) as f32 / (2.0 * n)).cos())
                .sum();
            scale * sum
        })
        .collect()
}

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10f32.powf(mel / 2595.0) - 1.0)
}
