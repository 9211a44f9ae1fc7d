//! Small hand-built artifacts for dispatcher tests.
//!
//! The vocabulary has a few stance-bearing words per class, and every model
//! is weighted so that hoax/fake → Anti, love/environment/act/must → Pro,
//! news/breaking/report → News, and text with no evidence → Neutral.

use std::path::PathBuf;
use std::sync::Arc;

use ecasa_core::{ModelId, ModelRegistry};
use serde_json::json;
use tempfile::TempDir;

use crate::{Dispatcher, TfidfVectorizer};

const VOCAB: [&str; 11] = [
    "hoax",
    "fake",
    "news",
    "breaking",
    "report",
    "love",
    "environment",
    "act",
    "must",
    "climate",
    "change",
];

const CLASSES: [i64; 4] = [-1, 0, 1, 2];

const ANTI_WORDS: &[&str] = &["hoax", "fake"];
const PRO_WORDS: &[&str] = &["love", "environment", "act", "must"];
const NEWS_WORDS: &[&str] = &["news", "breaking", "report"];

const KNN_EXEMPLARS: &[(&str, i64)] = &[
    ("climate change", 0),
    ("hoax climate change is fake", -1),
    ("fake hoax", -1),
    ("we must act for the environment", 1),
    ("love the environment", 1),
    ("breaking news report", 2),
    ("news report", 2),
];

pub(crate) struct Fixture {
    dir: TempDir,
    vectorizer: Arc<TfidfVectorizer>,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let dir = TempDir::new().unwrap();

        let vocabulary: serde_json::Map<String, serde_json::Value> = VOCAB
            .iter()
            .enumerate()
            .map(|(i, term)| (term.to_string(), json!(i)))
            .collect();
        let vectorizer_json = json!({
            "vocabulary": vocabulary,
            "idf": vec![1.0f32; VOCAB.len()],
            "norm": "l2",
        });
        write_json(&dir, "tfidf_vect_model.json", &vectorizer_json);
        let vectorizer = TfidfVectorizer::load(&dir.path().join("tfidf_vect_model.json")).unwrap();

        let stance_rows = |scale: f32| {
            vec![
                row(ANTI_WORDS, 3.0 * scale),
                row(&[], 0.0),
                row(PRO_WORDS, 2.0 * scale),
                row(NEWS_WORDS, 2.0 * scale),
            ]
        };

        write_json(
            &dir,
            "lr_model.json",
            &json!({
                "kind": "logistic_regression",
                "coef": stance_rows(1.0),
                "intercept": [0.0, 0.1, 0.0, 0.0],
                "classes": CLASSES,
            }),
        );

        write_json(
            &dir,
            "svc_model.json",
            &json!({
                "kind": "linear_svc",
                "coef": stance_rows(1.5),
                "intercept": [-0.2, 0.05, -0.2, -0.2],
                "classes": CLASSES,
            }),
        );

        let likelihood = |own: &[&str], default: f32| -> Vec<f32> {
            VOCAB
                .iter()
                .map(|t| match *t {
                    "climate" | "change" => -2.0,
                    t if own.contains(&t) => -1.0,
                    _ => default,
                })
                .collect()
        };
        write_json(
            &dir,
            "nb_model.json",
            &json!({
                "kind": "multinomial_nb",
                "class_log_prior": [-1.5, -1.2, -1.4, -1.5],
                "feature_log_prob": [
                    likelihood(ANTI_WORDS, -4.0),
                    likelihood(&[], -3.0),
                    likelihood(PRO_WORDS, -4.0),
                    likelihood(NEWS_WORDS, -4.0),
                ],
                "classes": CLASSES,
            }),
        );

        let fit_x: Vec<Vec<f32>> = KNN_EXEMPLARS
            .iter()
            .map(|(text, _)| vectorizer.transform(text))
            .collect();
        let fit_y: Vec<i64> = KNN_EXEMPLARS.iter().map(|(_, y)| *y).collect();
        write_json(
            &dir,
            "knn_model.json",
            &json!({
                "kind": "k_neighbors",
                "fit_x": fit_x,
                "fit_y": fit_y,
                "n_neighbors": 3,
                "weights": "distance",
            }),
        );

        Self {
            dir,
            vectorizer: Arc::new(vectorizer),
        }
    }

    pub(crate) fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub(crate) fn dim(&self) -> usize {
        VOCAB.len()
    }

    pub(crate) fn vectorizer(&self) -> Arc<TfidfVectorizer> {
        Arc::clone(&self.vectorizer)
    }

    /// Same vocabulary plus one extra term, as if refitted on other data.
    pub(crate) fn wider_vectorizer(&self) -> TfidfVectorizer {
        let mut vocabulary: serde_json::Map<String, serde_json::Value> = VOCAB
            .iter()
            .enumerate()
            .map(|(i, term)| (term.to_string(), json!(i)))
            .collect();
        vocabulary.insert("warming".to_string(), json!(VOCAB.len()));
        TfidfVectorizer::from_json(&json!({ "vocabulary": vocabulary }).to_string()).unwrap()
    }

    pub(crate) fn registry(&self) -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        registry.insert(ModelId::LogisticRegression, self.path("lr_model.json"));
        registry.insert(ModelId::SupportVector, self.path("svc_model.json"));
        registry.insert(ModelId::NaiveBayes, self.path("nb_model.json"));
        registry.insert(ModelId::KNeighbours, self.path("knn_model.json"));
        registry
    }

    pub(crate) fn dispatcher(&self, cache_models: bool) -> Dispatcher {
        Dispatcher::new(self.vectorizer(), self.registry(), cache_models)
    }
}

fn row(words: &[&str], weight: f32) -> Vec<f32> {
    VOCAB
        .iter()
        .map(|t| if words.contains(t) { weight } else { 0.0 })
        .collect()
}

fn write_json(dir: &TempDir, name: &str, value: &serde_json::Value) {
    std::fs::write(dir.path().join(name), value.to_string()).unwrap();
}
