//! Pre-fitted TF-IDF vectorizer.
//!
//! The vectorizer is fitted upstream and exported as JSON: a vocabulary of
//! term → column, per-column IDF weights, and the handful of settings that
//! change how raw text is tokenized and weighted. Loading validates the
//! artifact; transforming never fails.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::PredictError;

/// Row normalization applied after TF-IDF weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk layout of a fitted vectorizer.
#[derive(Debug, Deserialize)]
struct TfidfArtifact {
    vocabulary: HashMap<String, usize>,
    #[serde(default)]
    idf: Vec<f32>,
    #[serde(default = "default_true")]
    lowercase: bool,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
    #[serde(default)]
    stop_words: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Text → fixed-width TF-IDF feature vector.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    lowercase: bool,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    norm: Option<Norm>,
    stop_words: HashSet<String>,
}

impl TfidfVectorizer {
    /// Load a fitted vectorizer from a JSON artifact.
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let text = std::fs::read_to_string(path).map_err(|e| PredictError::artifact(path, e))?;
        let vectorizer = Self::from_json(&text).map_err(|reason| PredictError::artifact(path, reason))?;
        info!(
            dim = vectorizer.dim(),
            ngrams = ?vectorizer.ngram_range,
            path = %path.display(),
            "loaded vectorizer"
        );
        Ok(vectorizer)
    }

    /// Parse and validate a vectorizer artifact.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let artifact: TfidfArtifact = serde_json::from_str(text).map_err(|e| e.to_string())?;
        Self::try_from_artifact(artifact)
    }

    fn try_from_artifact(artifact: TfidfArtifact) -> Result<Self, String> {
        let dim = artifact.vocabulary.len();
        if let Some((term, &col)) = artifact.vocabulary.iter().find(|(_, col)| **col >= dim) {
            return Err(format!("vocabulary column {col} for {term:?} out of range 0..{dim}"));
        }
        if !artifact.idf.is_empty() && artifact.idf.len() != dim {
            return Err(format!(
                "idf has {} weights for a vocabulary of {dim} terms",
                artifact.idf.len()
            ));
        }
        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({min_n}, {max_n})"));
        }

        let lowercase = artifact.lowercase;
        let stop_words = artifact
            .stop_words
            .into_iter()
            .map(|w| if lowercase { w.to_lowercase() } else { w })
            .collect();

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            lowercase,
            ngram_range: artifact.ngram_range,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
            stop_words,
        })
    }

    /// Width of every vector produced by [`transform`](Self::transform).
    pub fn dim(&self) -> usize {
        self.vocabulary.len()
    }

    /// Transform one document into a dense feature vector of width [`dim`](Self::dim).
    ///
    /// Terms outside the vocabulary are ignored, so text with no known terms
    /// (including the empty string) yields the zero vector.
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for term in self.analyze(text) {
            if let Some(&col) = self.vocabulary.get(&term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut features = vec![0.0f32; self.dim()];
        for (col, count) in counts {
            let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
            let idf = self.idf.get(col).copied().unwrap_or(1.0);
            features[col] = tf * idf;
        }

        match self.norm {
            Some(Norm::L2) => normalize_l2(&mut features),
            Some(Norm::L1) => normalize_l1(&mut features),
            None => {}
        }
        features
    }

    /// Tokenize and expand into the configured n-grams.
    fn analyze(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.ngram_range;
        if (min_n, max_n) == (1, 1) {
            return tokens;
        }

        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Word tokens: maximal runs of alphanumerics or `_`, at least two
    /// characters long, stop words removed.
    fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|t| t.chars().count() >= 2)
            .filter(|t| !self.stop_words.contains(*t))
            .map(str::to_string)
            .collect()
    }
}

/// L2-normalize a vector in place.
fn normalize_l2(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

fn normalize_l1(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x.abs()).sum();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
