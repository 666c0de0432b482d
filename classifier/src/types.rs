pub type Data = ndarray::Array2<f32>;
pub type PredictedLabels = ndarray::Array1<f32>;
