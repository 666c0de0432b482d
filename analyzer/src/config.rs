//! Fixed analysis parameters shared by the feature and spectrogram paths.

pub const N_FFT: usize = 2048;
pub const HOP_LENGTH: usize = 512;
pub const N_MELS: usize = 128;
pub const N_MFCC: usize = 20;
pub const N_CHROMA: usize = 12;

/// Six aggregate spectral statistics plus the mean cepstral coefficients.
pub const N_FEATURES: usize = 6 + N_MFCC;

/// Energy percentile defining the spectral rolloff frequency.
pub const ROLLOFF_PERCENT: f32 = 0.85;
