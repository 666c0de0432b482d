use std::path::Path;

use crate::resample::resample;
use crate::CodecError;

/// Decodes a WAV file into mono f32 samples at `target_rate`.
///
/// Multi-channel audio is averaged down to one channel and sample rates
/// other than the target are resampled.
pub fn load_wav(path: &Path, target_rate: u32) -> Result<Vec<f32>, CodecError> {
    let decode_err = |source| CodecError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let reader = hound::WavReader::open(path).map_err(decode_err)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(decode_err)?,
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<_, _>>()
                .map_err(decode_err)?
        }
    };

    let mono = if spec.channels > 1 {
        samples
            .chunks(spec.channels as usize)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    } else {
        samples
    };

    if spec.sample_rate == target_rate {
        Ok(mono)
    } else {
        resample(&mono, spec.sample_rate, target_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::load_wav;
    use crate::{CodecError, SAMPLE_RATE};

    fn write_wav(path: &std::path::Path, spec: hound::WavSpec, samples: &[i16]) {
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn stereo_is_downmixed_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        // Left at full scale, right silent.
        write_wav(&path, spec, &[i16::MAX, 0, i16::MAX, 0]);

        let samples = load_wav(&path, SAMPLE_RATE).unwrap();
        assert_eq!(samples.len(), 2);
        for s in samples {
            assert!((s - 0.5).abs() < 1e-3, "expected ~0.5, got {s}");
        }
    }

    #[test]
    fn mismatched_rate_is_resampled_to_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hi.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 32_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        write_wav(&path, spec, &vec![1000i16; 32_000]);

        let samples = load_wav(&path, SAMPLE_RATE).unwrap();
        // One second of audio at half the source rate, within resampler slack.
        let expected = SAMPLE_RATE as usize;
        assert!(
            samples.len().abs_diff(expected) < expected / 10,
            "expected ~{expected} samples, got {}",
            samples.len()
        );
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.wav");
        std::fs::write(&path, b"this is not audio at all").unwrap();

        let err = load_wav(&path, SAMPLE_RATE).unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
    }
}
