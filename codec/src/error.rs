use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while storing, converting or decoding an uploaded clip.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unsupported container: {0:?}")]
    UnsupportedContainer(String),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: hound::Error,
    },
    #[error("resampling failed: {0}")]
    Resample(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
