//! Application configuration: artifact locations and the model registry.
//!
//! Every path in [`AppConfig`] is relative to `resources_dir` unless it is
//! absolute. The defaults reproduce the layout the trained artifacts ship in:
//!
//! ```text
//! resources/
//!   Models/tfidf_vect_model.json
//!   Models/{lr,svc,nb,knn}_model.json
//!   Files/train.csv
//!   Visuals/*.png
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{CoreError, ModelId};

pub const DEFAULT_RESOURCES_DIR: &str = "resources";
pub const DEFAULT_VECTORIZER: &str = "Models/tfidf_vect_model.json";
pub const DEFAULT_DATASET: &str = "Files/train.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub resources_dir: PathBuf,
    pub vectorizer: PathBuf,
    pub dataset: PathBuf,
    /// Model display name → artifact path.
    pub models: BTreeMap<String, PathBuf>,
    /// Keep deserialized models in memory between predictions.
    pub cache_models: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let models = ModelId::ALL
            .iter()
            .map(|id| (id.display_name().to_string(), PathBuf::from(id.default_artifact())))
            .collect();
        Self {
            resources_dir: PathBuf::from(DEFAULT_RESOURCES_DIR),
            vectorizer: PathBuf::from(DEFAULT_VECTORIZER),
            dataset: PathBuf::from(DEFAULT_DATASET),
            models,
            cache_models: true,
        }
    }
}

impl AppConfig {
    /// Read a JSON config file. Missing keys fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|e| CoreError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_json(&text).map_err(|reason| CoreError::Config {
            path: path.to_path_buf(),
            reason,
        })?;
        info!(path = %path.display(), models = config.models.len(), "loaded config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    pub fn with_resources_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resources_dir = dir.into();
        self
    }

    /// Resolve a configured path against `resources_dir`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.resources_dir.join(path)
        }
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.resolve(&self.vectorizer)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.resolve(&self.dataset)
    }

    /// Build the model registry with resolved paths.
    ///
    /// Fails with [`CoreError::InvalidModelSelection`] if a configured name is
    /// not a supported model, and with [`CoreError::DuplicateModel`] if two
    /// names (say `lr` and `Logistic Regression`) select the same model.
    pub fn registry(&self) -> Result<ModelRegistry, CoreError> {
        let mut registry = ModelRegistry::new();
        for (name, path) in &self.models {
            let id: ModelId = name.parse()?;
            if registry.path(id).is_some() {
                return Err(CoreError::DuplicateModel(id));
            }
            registry.insert(id, self.resolve(path));
        }
        debug!(models = registry.len(), "built model registry");
        Ok(registry)
    }
}

/// Fixed mapping from model identifier to artifact location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelRegistry {
    paths: BTreeMap<ModelId, PathBuf>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ModelId, path: impl Into<PathBuf>) {
        self.paths.insert(id, path.into());
    }

    pub fn path(&self, id: ModelId) -> Option<&Path> {
        self.paths.get(&id).map(PathBuf::as_path)
    }

    /// Parse a user-supplied model name and look up its artifact.
    ///
    /// A supported name with no configured artifact is also an invalid
    /// selection: the dispatcher has nothing to load.
    pub fn resolve(&self, name: &str) -> Result<(ModelId, &Path), CoreError> {
        let id: ModelId = name.parse()?;
        let path = self
            .path(id)
            .ok_or_else(|| CoreError::InvalidModelSelection(name.trim().to_string()))?;
        Ok((id, path))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModelId, &Path)> {
        self.paths.iter().map(|(id, p)| (*id, p.as_path()))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
