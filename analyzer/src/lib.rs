mod chroma;
pub mod config;
mod features;
pub mod mfcc;
mod scaler;
mod stft;

pub use features::{extract_features, FeatureError, FeatureVector};
pub use scaler::{FeatureScaler, ScalerError};
pub use stft::Stft;
