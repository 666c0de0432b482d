use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::{StoredClip, SAMPLE_RATE};

/// Re-encodes a stored clip to canonical mono 16 kHz WAV via the external
/// `ffmpeg` binary. Clips already in a WAV container are passed through.
///
/// Conversion failure is not fatal: the failure is logged and the original,
/// unconverted file is returned for the rest of the pipeline to try.
pub fn convert_to_wav(clip: &mut StoredClip) -> PathBuf {
    let source = clip.path().to_path_buf();
    if source
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
    {
        return source;
    }

    let target = clip.derive("converted.wav");

    let status = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(&source)
        .args(["-ar", &SAMPLE_RATE.to_string()])
        .args(["-ac", "1"])
        .arg(&target)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) if status.success() => target,
        Ok(status) => {
            log::warn!(
                "ffmpeg exited with {status} converting {}, using original file",
                source.display()
            );
            source
        }
        Err(err) => {
            log::warn!(
                "failed to spawn ffmpeg for {}: {err}, using original file",
                source.display()
            );
            source
        }
    }
}
