//! Inference layer: TF-IDF vectorization, classifier artifacts, and prediction dispatch.

mod cache;
mod dispatcher;
mod error;
mod model;
#[cfg(feature = "onnx")]
mod onnx;
mod vectorizer;

#[cfg(test)]
mod fixtures;

pub use cache::ModelCache;
pub use dispatcher::{Dispatcher, Prediction, predict_code};
pub use error::PredictError;
pub use model::{Classifier, KNeighbours, LinearModel, ModelArtifact, NaiveBayes, load_classifier};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use vectorizer::{Norm, TfidfVectorizer};
