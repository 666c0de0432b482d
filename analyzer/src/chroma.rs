use crate::config::{N_CHROMA, N_FFT};

/// Mean chroma energy across pitch classes and frames.
///
/// Each spectrum bin contributes its power to the pitch class of the nearest
/// equal-tempered note; every frame is normalized by its strongest class
/// before averaging.
pub fn chroma_mean(magnitudes: &[Vec<f32>], sample_rate: u32) -> f32 {
    let bins = magnitudes.first().map_or(0, Vec::len);
    let classes = bin_pitch_classes(sample_rate, bins);

    let mut total = 0.0f32;
    let mut count = 0usize;

    for frame in magnitudes {
        let mut chroma = [0.0f32; N_CHROMA];
        for (bin, &magnitude) in frame.iter().enumerate() {
            if let Some(class) = classes[bin] {
                chroma[class] += magnitude * magnitude;
            }
        }

        let max = chroma.iter().fold(0.0f32, |max, &v| max.max(v));
        if max > 0.0 {
            for v in &mut chroma {
                *v /= max;
            }
        }

        total += chroma.iter().sum::<f32>();
        count += N_CHROMA;
    }

    if count == 0 {
        0.0
    } else {
        total / count as f32
    }
}

/// Pitch class of every spectrum bin; sub-audible bins carry no pitch.
fn bin_pitch_classes(sample_rate: u32, bins: usize) -> Vec<Option<usize>> {
    (0..bins)
        .map(|bin| {
            let freq = bin as f32 * sample_rate as f32 / N_FFT as f32;
            if freq < 20.0 {
                return None;
            }
            let midi = 69.0 + 12.0 * (freq / 440.0).log2();
            Some(midi.round().rem_euclid(12.0) as usize % N_CHROMA)
        })
        .collect()
}
