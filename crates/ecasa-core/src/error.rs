use std::path::PathBuf;

use thiserror::Error;

use crate::ModelId;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid model selection: {0:?}")]
    InvalidModelSelection(String),

    #[error("config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("unknown visualization: {0:?}")]
    UnknownVisualization(String),

    #[error("model {0} is configured more than once")]
    DuplicateModel(ModelId),
}
