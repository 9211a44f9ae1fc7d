//! Per-identifier cache of deserialized classifiers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use ecasa_core::ModelId;
use tracing::debug;

use crate::{Classifier, PredictError};

/// Thread-safe map from model identifier to a loaded classifier.
///
/// A failed load is not cached; the next request tries the artifact again.
#[derive(Default)]
pub struct ModelCache {
    models: Mutex<HashMap<ModelId, Arc<dyn Classifier>>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load<F>(&self, id: ModelId, loader: F) -> Result<Arc<dyn Classifier>, PredictError>
    where
        F: FnOnce() -> Result<Arc<dyn Classifier>, PredictError>,
    {
        if let Some(model) = self.lock().get(&id) {
            debug!(model = %id, "model cache hit");
            return Ok(Arc::clone(model));
        }

        // Load outside the lock; a concurrent load of the same id just
        // replaces an equivalent entry.
        let model = loader()?;
        self.lock().insert(id, Arc::clone(&model));
        Ok(model)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ModelId, Arc<dyn Classifier>>> {
        self.models.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
