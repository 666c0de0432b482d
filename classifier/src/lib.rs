use std::{path::Path, sync::Mutex};

use anyhow::anyhow;
use ort::session::Session;
use ort::value::Tensor;

mod label;
mod prediction;
mod types;

pub use self::label::Label;
pub use self::prediction::Prediction;
pub use self::types::{Data, PredictedLabels};

/// Number of classes the model was trained on.
pub const N_CLASSES: usize = 2;

pub trait Classify: Send + Sync {
    fn classify(&self, data: &Data) -> anyhow::Result<PredictedLabels>;
}

/// Quantized ONNX model loaded once at startup.
///
/// The session requires `&mut` for inference, so access is serialized
/// behind a mutex rather than assumed safe for concurrent invocation.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
}

impl OnnxClassifier {
    pub fn load<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let session = Session::builder()?
            .with_intra_threads(1)?
            .commit_from_file(path.as_ref())?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| anyhow!("model declares no inputs"))?;

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }
}

impl Classify for OnnxClassifier {
    fn classify(&self, data: &Data) -> anyhow::Result<PredictedLabels> {
        let tensor = Tensor::from_array(data.clone())?;

        let mut session = self.session.lock().unwrap();
        let outputs = session.run(ort::inputs![self.input_name.as_str() => tensor])?;

        let (_, value) = outputs
            .iter()
            .next()
            .ok_or_else(|| anyhow!("model produced no output"))?;
        let (_shape, logits) = value.try_extract_tensor::<f32>()?;

        Ok(softmax(logits))
    }
}

/// Numerically stable softmax over raw class logits.
#[must_use]
pub fn softmax(logits: &[f32]) -> PredictedLabels {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps = logits.iter().map(|&l| (l - max).exp()).collect::<Vec<_>>();
    let sum: f32 = exps.iter().sum();

    PredictedLabels::from_vec(exps.into_iter().map(|e| e / sum).collect())
}
