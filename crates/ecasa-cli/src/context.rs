//! Process-wide application state, built once at startup.

use std::sync::Arc;

use anyhow::Context;
use ecasa_ai::{Dispatcher, TfidfVectorizer};
use ecasa_core::AppConfig;
use ecasa_store::TweetStore;
use tracing::warn;

/// Everything a request needs: the shared vectorizer (inside the
/// dispatcher) and the read-only tweet dataset.
pub struct AppContext {
    pub config: AppConfig,
    pub dispatcher: Dispatcher,
    pub tweets: TweetStore,
}

impl AppContext {
    /// Load the vectorizer, build the model registry, and import the dataset.
    ///
    /// The vectorizer is required. A missing or unreadable dataset only
    /// disables exploration, since prediction never reads it.
    pub fn load(config: AppConfig) -> anyhow::Result<Self> {
        let vectorizer_path = config.vectorizer_path();
        let vectorizer = TfidfVectorizer::load(&vectorizer_path)
            .with_context(|| format!("loading vectorizer {}", vectorizer_path.display()))?;

        let registry = config.registry().context("building model registry")?;
        let dispatcher = Dispatcher::new(Arc::new(vectorizer), registry, config.cache_models);

        let tweets = TweetStore::open().context("opening dataset store")?;
        let dataset_path = config.dataset_path();
        if let Err(e) = tweets.load_tweets(&dataset_path) {
            warn!(path = %dataset_path.display(), error = %e, "dataset unavailable");
        }

        Ok(Self {
            config,
            dispatcher,
            tweets,
        })
    }
}
