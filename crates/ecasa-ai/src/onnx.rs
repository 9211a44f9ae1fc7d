//! ONNX Runtime backend for classifiers exported from the training notebooks.
//!
//! Expects a single float input of shape `[batch, n_features]` and a label
//! tensor of `int64` class codes as the first output, which is what the
//! scikit-learn converters emit.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use ort::session::Session;
use ort::value::{Tensor, ValueType};

use crate::{Classifier, PredictError};

pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
    n_features: usize,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        if !path.exists() {
            return Err(PredictError::artifact(path, "file not found"));
        }

        let session = Session::builder()
            .map_err(|e| PredictError::artifact(path, e))?
            .commit_from_file(path)
            .map_err(|e| PredictError::artifact(path, e))?;

        let input = session
            .inputs()
            .first()
            .ok_or_else(|| PredictError::artifact(path, "model has no inputs"))?;
        let input_name = input.name().to_string();
        let n_features = match input.dtype() {
            ValueType::Tensor { shape, .. } => feature_width(shape),
            _ => None,
        }
        .ok_or_else(|| PredictError::artifact(path, "input is not a [batch, features] tensor"))?;

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            n_features,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &[f32]) -> Result<i64, PredictError> {
        PredictError::ensure_width(self.n_features, features.len())?;

        let shape = [1i64, self.n_features as i64];
        let tensor = Tensor::from_array((shape, features.to_vec().into_boxed_slice()))
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        let (_, labels) = outputs[0]
            .try_extract_tensor::<i64>()
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        labels
            .first()
            .copied()
            .ok_or_else(|| PredictError::Inference("empty label tensor".to_string()))
    }
}

/// Width of a `[features]` or `[batch, features]` input. The batch axis may
/// be dynamic (`-1`); the feature axis must be fixed.
fn feature_width(dims: &[i64]) -> Option<usize> {
    match dims {
        [features] | [_, features] if *features > 0 => usize::try_from(*features).ok(),
        _ => None,
    }
}
