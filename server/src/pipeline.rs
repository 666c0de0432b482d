use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use analyzer::config::N_FEATURES;
use classifier::Prediction;
use codec::{StoredClip, SAMPLE_RATE};

use crate::response::AnalyzeResponse;
use crate::state::AppState;

/// Runs the full blocking pipeline for one upload.
///
/// Never fails: each stage degrades per its documented policy, so the
/// outcome is always a well-formed reply. Scratch files are removed when
/// the stored clip drops, on every path through here.
pub fn analyze_clip(state: &AppState, original_name: &str, bytes: &[u8]) -> AnalyzeResponse {
    let fallback_name = codec::sanitize_filename(original_name);

    let mut clip = match state.ingest.store(original_name, bytes) {
        Ok(clip) => clip,
        Err(err) => {
            log::error!("failed to store upload {fallback_name:?}: {err}");
            return AnalyzeResponse::unreadable(fallback_name);
        }
    };

    let wav_path = codec::convert_to_wav(&mut clip);

    let samples = match codec::load_wav(&wav_path, SAMPLE_RATE) {
        Ok(samples) => samples,
        Err(err) => {
            log::error!("failed to decode upload {}: {err}", clip.id());
            return AnalyzeResponse::unreadable(clip.filename().to_string());
        }
    };
    let samples = codec::pad_or_truncate(samples);

    // Independent of the classifier path.
    let spectrogram = render_spectrogram(&mut clip, &samples);

    let features = match analyzer::extract_features(&samples, SAMPLE_RATE) {
        Ok(features) => features,
        Err(err) => {
            log::error!("feature extraction failed for {}: {err}", clip.id());
            analyzer::FeatureVector::zeros(N_FEATURES)
        }
    };

    let data = state.scaler.transform(&features);
    let prediction = match state.classifier.classify(&data) {
        Ok(probs) => Prediction::from_labels(&probs),
        Err(err) => {
            log::error!("inference failed for {}: {err:#}", clip.id());
            Prediction::unknown()
        }
    };

    AnalyzeResponse::new(clip.filename().to_string(), prediction, spectrogram)
}

fn render_spectrogram(clip: &mut StoredClip, samples: &[f32]) -> String {
    let path = clip.derive("spec.png");
    match spectrogram::render(samples, SAMPLE_RATE, &path) {
        Ok(()) => match std::fs::read(&path) {
            Ok(bytes) => BASE64_STANDARD.encode(bytes),
            Err(err) => {
                log::warn!("failed to read rendered spectrogram: {err}");
                String::new()
            }
        },
        Err(err) => {
            log::warn!("spectrogram unavailable for {}: {err:#}", clip.id());
            String::new()
        }
    }
}
