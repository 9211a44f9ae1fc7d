//! Prediction dispatch: model selection → vectorization → inference → label.

use std::path::Path;
use std::sync::Arc;

use ecasa_core::{ModelId, ModelRegistry, Sentiment};
use tracing::{debug, warn};

use crate::{Classifier, ModelCache, PredictError, TfidfVectorizer, load_classifier};

/// Outcome of one prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    pub model: ModelId,
    /// Raw class code emitted by the classifier.
    pub code: i64,
    pub sentiment: Sentiment,
}

/// Vectorize `text` and run it through `classifier`.
///
/// The vectorizer width is checked against the model before inference, so a
/// vectorizer fitted on a different vocabulary fails loudly instead of
/// producing a prediction.
pub fn predict_code(
    classifier: &dyn Classifier,
    vectorizer: &TfidfVectorizer,
    text: &str,
) -> Result<i64, PredictError> {
    PredictError::ensure_width(classifier.n_features(), vectorizer.dim())?;
    let features = vectorizer.transform(text);
    classifier.predict(&features)
}

/// Routes prediction requests to the selected classifier.
///
/// Holds the shared vectorizer and the model registry. With caching enabled,
/// each classifier is deserialized on first use and reused afterwards;
/// otherwise every request reads the artifact from disk.
pub struct Dispatcher {
    vectorizer: Arc<TfidfVectorizer>,
    registry: ModelRegistry,
    cache: Option<ModelCache>,
}

impl Dispatcher {
    pub fn new(vectorizer: Arc<TfidfVectorizer>, registry: ModelRegistry, cache_models: bool) -> Self {
        Self {
            vectorizer,
            registry,
            cache: cache_models.then(ModelCache::new),
        }
    }

    /// Predict the sentiment of `text` with the model named `model`.
    ///
    /// `model` is a display name (`"Logistic Regression"`) or slug (`"lr"`).
    pub fn predict(&self, model: &str, text: &str) -> Result<Prediction, PredictError> {
        let (id, _) = self.registry.resolve(model)?;
        self.predict_with(id, text)
    }

    pub fn predict_with(&self, id: ModelId, text: &str) -> Result<Prediction, PredictError> {
        let path = self
            .registry
            .path(id)
            .ok_or_else(|| PredictError::InvalidModelSelection(id.display_name().to_string()))?;

        let classifier = self.classifier(id, path)?;
        let code = predict_code(classifier.as_ref(), &self.vectorizer, text)?;
        let sentiment = Sentiment::from_code(code);

        if !sentiment.is_known() {
            warn!(model = %id, code, "classifier emitted an unmapped class code");
        }
        debug!(model = %id, code, label = sentiment.as_str(), chars = text.len(), "prediction");

        Ok(Prediction {
            model: id,
            code,
            sentiment,
        })
    }

    fn classifier(&self, id: ModelId, path: &Path) -> Result<Arc<dyn Classifier>, PredictError> {
        let load = || load_classifier(path).map(Arc::from);
        match &self.cache {
            Some(cache) => cache.get_or_load(id, load),
            None => load(),
        }
    }

    /// Configured models and their artifact paths.
    pub fn models(&self) -> impl Iterator<Item = (ModelId, &Path)> {
        self.registry.iter()
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// Number of classifiers currently held in memory.
    pub fn cached_models(&self) -> usize {
        self.cache.as_ref().map_or(0, ModelCache::len)
    }
}
