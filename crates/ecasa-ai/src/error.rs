use std::fmt::Display;
use std::path::{Path, PathBuf};

use ecasa_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid model selection: {0:?}")]
    InvalidModelSelection(String),

    #[error("failed to load artifact {path}: {reason}")]
    ArtifactLoad { path: PathBuf, reason: String },

    #[error("feature shape mismatch: model expects {expected} features, got {actual}")]
    FeatureShapeMismatch { expected: usize, actual: usize },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error(transparent)]
    Core(CoreError),
}

impl PredictError {
    pub(crate) fn artifact(path: &Path, reason: impl Display) -> Self {
        Self::ArtifactLoad {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Fail unless a feature vector has the width the model was trained on.
    pub(crate) fn ensure_width(expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::FeatureShapeMismatch { expected, actual })
        }
    }
}

impl From<CoreError> for PredictError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidModelSelection(name) => Self::InvalidModelSelection(name),
            other => Self::Core(other),
        }
    }
}
