use analyzer::config::N_MELS;
use analyzer::mfcc::MelBank;
use analyzer::Stft;

/// Dynamic range kept below the peak, matching the renderer's color domain.
pub const TOP_DB: f32 = 80.0;

/// Mel power spectrogram in decibels relative to the clip's peak power.
///
/// Rows are analysis frames, columns mel bands; values lie in
/// `[-TOP_DB, 0]` with the loudest cell at 0 dB.
#[must_use]
pub fn mel_power_db(samples: &[f32], sample_rate: u32) -> Vec<Vec<f32>> {
    let bank = MelBank::new(N_MELS, sample_rate);

    let mut mel: Vec<Vec<f32>> = Stft::new()
        .magnitudes(samples)
        .iter()
        .map(|frame| {
            let power: Vec<f32> = frame.iter().map(|m| m * m).collect();
            bank.apply(&power)
        })
        .collect();

    let peak = mel
        .iter()
        .flatten()
        .fold(1e-10f32, |peak, &v| peak.max(v));

    for frame in &mut mel {
        for v in frame {
            let db = 10.0 * (v.max(1e-10) / peak).log10();
            *v = db.max(-TOP_DB);
        }
    }

    mel
}
