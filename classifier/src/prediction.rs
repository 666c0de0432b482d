use crate::{Label, PredictedLabels};

/// Outcome of one forward pass, ready for the response assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: Label,
    pub confidence: f32,
    pub probabilities: Vec<f32>,
}

impl Prediction {
    /// Picks the argmax class from a probability vector.
    #[must_use]
    pub fn from_labels(probs: &PredictedLabels) -> Self {
        let argmax = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal));

        match argmax {
            Some((index, &confidence)) => Self {
                label: Label::from_index(index),
                confidence,
                probabilities: probs.to_vec(),
            },
            None => Self::unknown(),
        }
    }

    /// Degraded result when inference failed.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            label: Label::Unknown,
            confidence: 0.0,
            probabilities: vec![],
        }
    }
}
