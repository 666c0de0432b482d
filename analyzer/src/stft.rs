use std::f32::consts::PI;
use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex};

use crate::config::{HOP_LENGTH, N_FFT};

/// Short-time Fourier transform with a reusable plan and Hann window.
pub struct Stft {
    plan: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
}

impl Stft {
    #[must_use]
    pub fn new() -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        Self {
            plan: planner.plan_fft_forward(N_FFT),
            window: hann_window(N_FFT),
        }
    }

    /// Magnitude spectra of overlapping windowed frames, `N_FFT / 2 + 1`
    /// bins each. Short tails are zero-padded.
    #[must_use]
    pub fn magnitudes(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        let count = frame_count(samples.len());
        let mut input = self.plan.make_input_vec();
        let mut spectrum = self.plan.make_output_vec();
        let mut frames = Vec::with_capacity(count);

        for index in 0..count {
            let start = index * HOP_LENGTH;
            for (i, slot) in input.iter_mut().enumerate() {
                *slot = samples.get(start + i).copied().unwrap_or(0.0) * self.window[i];
            }

            if self.plan.process(&mut input, &mut spectrum).is_err() {
                continue;
            }

            frames.push(spectrum.iter().map(|c| c.norm()).collect());
        }

        frames
    }
}

impl Default for Stft {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of analysis frames for a signal of `len` samples.
#[must_use]
pub fn frame_count(len: usize) -> usize {
    if len <= N_FFT {
        1
    } else {
        (len - N_FFT) / HOP_LENGTH + 1
    }
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let angle = 2.0 * PI * i as f32 / (size as f32 - 1.0);
            0.5 * (1.0 - angle.cos())
        })
        .collect()
}
