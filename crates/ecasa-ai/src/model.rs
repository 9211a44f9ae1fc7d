//! Pre-trained classifier artifacts.
//!
//! Native artifacts are JSON documents tagged by `kind`, carrying the fitted
//! parameters of a linear model, a multinomial naive Bayes model, or a
//! k-nearest-neighbours index. Files ending in `.onnx` go through ONNX
//! Runtime instead (behind the `onnx` feature).

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::PredictError;

/// A loaded classifier producing one class code per feature vector.
pub trait Classifier: Send + Sync {
    /// Short description of the model family.
    fn name(&self) -> &str;

    /// Feature width the model was trained on.
    fn n_features(&self) -> usize;

    /// Predict the class code for one dense feature vector.
    fn predict(&self, features: &[f32]) -> Result<i64, PredictError>;
}

/// Native artifact formats.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LinearModel),
    LinearSvc(LinearModel),
    MultinomialNb(NaiveBayes),
    KNeighbors(KNeighbours),
}

impl ModelArtifact {
    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    /// Validate parameter shapes and hand back a ready classifier.
    pub fn into_classifier(self) -> Result<Box<dyn Classifier>, String> {
        match self {
            Self::LogisticRegression(mut m) => {
                m.kind = "logistic regression";
                m.validate()?;
                Ok(Box::new(m))
            }
            Self::LinearSvc(mut m) => {
                m.kind = "linear svc";
                m.validate()?;
                Ok(Box::new(m))
            }
            Self::MultinomialNb(m) => {
                m.validate()?;
                Ok(Box::new(m))
            }
            Self::KNeighbors(m) => {
                m.validate()?;
                Ok(Box::new(m))
            }
        }
    }
}

/// Load a classifier artifact, choosing the backend by file extension.
pub fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, PredictError> {
    let is_onnx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("onnx"));

    let classifier = if is_onnx {
        load_onnx(path)?
    } else {
        let text = std::fs::read_to_string(path).map_err(|e| PredictError::artifact(path, e))?;
        ModelArtifact::from_json(&text)
            .and_then(ModelArtifact::into_classifier)
            .map_err(|reason| PredictError::artifact(path, reason))?
    };

    info!(
        model = classifier.name(),
        n_features = classifier.n_features(),
        path = %path.display(),
        "loaded classifier"
    );
    Ok(classifier)
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &Path) -> Result<Box<dyn Classifier>, PredictError> {
    Ok(Box::new(crate::onnx::OnnxClassifier::load(path)?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(path: &Path) -> Result<Box<dyn Classifier>, PredictError> {
    Err(PredictError::artifact(
        path,
        "ONNX artifacts need the `onnx` feature",
    ))
}

// ── Linear models ──

/// Logistic regression or linear SVC: `argmax(coef · x + intercept)`.
///
/// A single coefficient row with two classes is the binary layout: a
/// positive decision value selects `classes[1]`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub coef: Vec<Vec<f32>>,
    pub intercept: Vec<f32>,
    pub classes: Vec<i64>,
    #[serde(skip)]
    kind: &'static str,
}

impl LinearModel {
    fn validate(&self) -> Result<(), String> {
        check_rows("coef", &self.coef)?;
        if self.intercept.len() != self.coef.len() {
            return Err(format!(
                "intercept has {} values for {} coefficient rows",
                self.intercept.len(),
                self.coef.len()
            ));
        }
        let binary = self.coef.len() == 1 && self.classes.len() == 2;
        if !binary && self.coef.len() != self.classes.len() {
            return Err(format!(
                "{} coefficient rows for {} classes",
                self.coef.len(),
                self.classes.len()
            ));
        }
        Ok(())
    }

    fn decision(&self, features: &[f32]) -> Vec<f32> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| dot(row, features) + b)
            .collect()
    }
}

impl Classifier for LinearModel {
    fn name(&self) -> &str {
        self.kind
    }

    fn n_features(&self) -> usize {
        width(&self.coef)
    }

    fn predict(&self, features: &[f32]) -> Result<i64, PredictError> {
        PredictError::ensure_width(self.n_features(), features.len())?;
        let scores = self.decision(features);
        let idx = match scores.as_slice() {
            [score] if self.classes.len() == 2 => Some(usize::from(*score > 0.0)),
            _ => argmax(&scores),
        };
        class_at(&self.classes, idx)
    }
}

// ── Naive Bayes ──

/// Multinomial naive Bayes: `argmax(log P(c) + Σ x_j · log P(j | c))`.
#[derive(Debug, Clone, Deserialize)]
pub struct NaiveBayes {
    pub class_log_prior: Vec<f32>,
    pub feature_log_prob: Vec<Vec<f32>>,
    pub classes: Vec<i64>,
}

impl NaiveBayes {
    fn validate(&self) -> Result<(), String> {
        check_rows("feature_log_prob", &self.feature_log_prob)?;
        if self.class_log_prior.len() != self.classes.len()
            || self.feature_log_prob.len() != self.classes.len()
        {
            return Err(format!(
                "{} priors and {} likelihood rows for {} classes",
                self.class_log_prior.len(),
                self.feature_log_prob.len(),
                self.classes.len()
            ));
        }
        Ok(())
    }
}

impl Classifier for NaiveBayes {
    fn name(&self) -> &str {
        "multinomial naive bayes"
    }

    fn n_features(&self) -> usize {
        width(&self.feature_log_prob)
    }

    fn predict(&self, features: &[f32]) -> Result<i64, PredictError> {
        PredictError::ensure_width(self.n_features(), features.len())?;
        let joint: Vec<f32> = self
            .feature_log_prob
            .iter()
            .zip(&self.class_log_prior)
            .map(|(row, prior)| prior + dot(row, features))
            .collect();
        class_at(&self.classes, argmax(&joint))
    }
}

// ── k-nearest neighbours ──

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weights {
    #[default]
    Uniform,
    Distance,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Euclidean,
    Cosine,
}

/// Brute-force k-nearest-neighbours vote over the stored training vectors.
///
/// Ties in the vote go to the smallest class code.
#[derive(Debug, Clone, Deserialize)]
pub struct KNeighbours {
    pub fit_x: Vec<Vec<f32>>,
    pub fit_y: Vec<i64>,
    #[serde(default = "default_neighbours")]
    pub n_neighbors: usize,
    #[serde(default)]
    pub weights: Weights,
    #[serde(default)]
    pub metric: Metric,
}

fn default_neighbours() -> usize {
    5
}

impl KNeighbours {
    fn validate(&self) -> Result<(), String> {
        check_rows("fit_x", &self.fit_x)?;
        if self.fit_x.len() != self.fit_y.len() {
            return Err(format!(
                "{} samples with {} labels",
                self.fit_x.len(),
                self.fit_y.len()
            ));
        }
        if self.n_neighbors == 0 {
            return Err("n_neighbors must be positive".to_string());
        }
        Ok(())
    }

    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        let d = match self.metric {
            Metric::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
            Metric::Cosine => {
                let norms = dot(a, a).sqrt() * dot(b, b).sqrt();
                if norms > 0.0 {
                    1.0 - dot(a, b) / norms
                } else {
                    1.0
                }
            }
        };
        // Overflowing samples rank behind every finite neighbour.
        if d.is_nan() { f32::INFINITY } else { d }
    }
}

impl Classifier for KNeighbours {
    fn name(&self) -> &str {
        "k-nearest neighbours"
    }

    fn n_features(&self) -> usize {
        width(&self.fit_x)
    }

    fn predict(&self, features: &[f32]) -> Result<i64, PredictError> {
        PredictError::ensure_width(self.n_features(), features.len())?;

        let mut neighbours: Vec<(f32, i64)> = self
            .fit_x
            .iter()
            .zip(&self.fit_y)
            .map(|(x, &y)| (self.distance(x, features), y))
            .collect();
        // Stable sort keeps training order among equal distances.
        neighbours.sort_by(|a, b| a.0.total_cmp(&b.0));
        neighbours.truncate(self.n_neighbors);

        // Exact matches dominate a distance-weighted vote.
        let exact = neighbours.iter().any(|(d, _)| *d == 0.0);

        let mut votes: BTreeMap<i64, f32> = BTreeMap::new();
        for &(dist, label) in &neighbours {
            let weight = match self.weights {
                Weights::Uniform => 1.0,
                Weights::Distance if exact => {
                    if dist == 0.0 {
                        1.0
                    } else {
                        0.0
                    }
                }
                Weights::Distance => 1.0 / dist,
            };
            *votes.entry(label).or_insert(0.0) += weight;
        }

        let mut best: Option<(i64, f32)> = None;
        for (label, weight) in votes {
            if best.is_none_or(|(_, w)| weight > w) {
                best = Some((label, weight));
            }
        }
        best.map(|(label, _)| label)
            .ok_or_else(|| PredictError::Inference("no neighbours to vote".to_string()))
    }
}

// ── Helpers ──

fn check_rows(field: &str, rows: &[Vec<f32>]) -> Result<(), String> {
    let width = rows
        .first()
        .map(Vec::len)
        .ok_or_else(|| format!("{field} is empty"))?;
    if width == 0 {
        return Err(format!("{field} rows have no features"));
    }
    if let Some(i) = rows.iter().position(|r| r.len() != width) {
        return Err(format!(
            "{field} row {i} has {} features, expected {width}",
            rows[i].len()
        ));
    }
    Ok(())
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Index of the first maximum, `None` for no scores.
fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if best.is_none_or(|(_, b)| s > b) {
            best = Some((i, s));
        }
    }
    best.map(|(i, _)| i)
}

/// Row width of a parameter matrix; zero when it has no rows.
fn width(rows: &[Vec<f32>]) -> usize {
    rows.first().map_or(0, Vec::len)
}

fn class_at(classes: &[i64], idx: Option<usize>) -> Result<i64, PredictError> {
    idx.and_then(|i| classes.get(i).copied())
        .ok_or_else(|| PredictError::Inference("model has no classes".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(json: &str) -> Box<dyn Classifier> {
        ModelArtifact::from_json(json)
            .and_then(ModelArtifact::into_classifier)
            .unwrap()
    }

    #[test]
    fn multiclass_linear_picks_highest_decision() {
        let clf = classifier(
            r#"{ "kind": "logistic_regression",
                 "coef": [[1.0, 0.0], [0.0, 1.0], [-1.0, -1.0]],
                 "intercept": [0.0, 0.0, 0.5],
                 "classes": [0, 1, 2] }"#,
        );
        assert_eq!(clf.name(), "logistic regression");
        assert_eq!(clf.n_features(), 2);
        assert_eq!(clf.predict(&[0.9, 0.1]).unwrap(), 0);
        assert_eq!(clf.predict(&[0.1, 0.9]).unwrap(), 1);
        // Zero vector: only the intercept speaks.
        assert_eq!(clf.predict(&[0.0, 0.0]).unwrap(), 2);
    }

    #[test]
    fn binary_linear_uses_sign_of_decision() {
        let clf = classifier(
            r#"{ "kind": "linear_svc",
                 "coef": [[2.0, -2.0]], "intercept": [0.0], "classes": [-1, 1] }"#,
        );
        assert_eq!(clf.name(), "linear svc");
        assert_eq!(clf.predict(&[1.0, 0.0]).unwrap(), 1);
        assert_eq!(clf.predict(&[0.0, 1.0]).unwrap(), -1);
        // A zero decision value is not positive.
        assert_eq!(clf.predict(&[0.0, 0.0]).unwrap(), -1);
    }

    #[test]
    fn linear_ties_resolve_to_first_class() {
        let clf = classifier(
            r#"{ "kind": "logistic_regression",
                 "coef": [[0.0], [0.0], [0.0]], "intercept": [0.0, 0.0, 0.0],
                 "classes": [2, 0, 1] }"#,
        );
        assert_eq!(clf.predict(&[1.0]).unwrap(), 2);
    }

    #[test]
    fn naive_bayes_combines_prior_and_likelihood() {
        let clf = classifier(
            r#"{ "kind": "multinomial_nb",
                 "class_log_prior": [-0.1, -2.3],
                 "feature_log_prob": [[-3.0, -0.1], [-0.1, -3.0]],
                 "classes": [0, 1] }"#,
        );
        // No evidence: prior wins.
        assert_eq!(clf.predict(&[0.0, 0.0]).unwrap(), 0);
        // Strong evidence for feature 0 overrides the prior.
        assert_eq!(clf.predict(&[1.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn knn_majority_vote() {
        let clf = classifier(
            r#"{ "kind": "k_neighbors", "n_neighbors": 3,
                 "fit_x": [[0.0, 0.0], [0.1, 0.0], [0.0, 0.1], [5.0, 5.0]],
                 "fit_y": [1, 1, 2, 2] }"#,
        );
        assert_eq!(clf.predict(&[0.05, 0.05]).unwrap(), 1);
    }

    #[test]
    fn knn_vote_tie_goes_to_smallest_code() {
        let clf = classifier(
            r#"{ "kind": "k_neighbors", "n_neighbors": 2,
                 "fit_x": [[1.0], [-1.0]], "fit_y": [2, 0] }"#,
        );
        assert_eq!(clf.predict(&[0.0]).unwrap(), 0);
    }

    #[test]
    fn knn_distance_weights_prefer_exact_match() {
        let clf = classifier(
            r#"{ "kind": "k_neighbors", "n_neighbors": 3, "weights": "distance",
                 "fit_x": [[1.0, 0.0], [0.0, 1.0], [0.0, 0.9]], "fit_y": [0, 1, 1] }"#,
        );
        assert_eq!(clf.predict(&[1.0, 0.0]).unwrap(), 0);
    }

    #[test]
    fn knn_cosine_metric_ignores_magnitude() {
        let clf = classifier(
            r#"{ "kind": "k_neighbors", "n_neighbors": 1, "metric": "cosine",
                 "fit_x": [[10.0, 0.0], [0.1, 0.1]], "fit_y": [0, 1] }"#,
        );
        assert_eq!(clf.predict(&[0.5, 0.0]).unwrap(), 0);
    }

    #[test]
    fn wrong_width_is_feature_shape_mismatch() {
        let clf = classifier(
            r#"{ "kind": "multinomial_nb", "class_log_prior": [0.0],
                 "feature_log_prob": [[0.0, 0.0, 0.0]], "classes": [1] }"#,
        );
        match clf.predict(&[1.0, 2.0]) {
            Err(PredictError::FeatureShapeMismatch { expected, actual }) => {
                assert_eq!((expected, actual), (3, 2));
            }
            other => panic!("expected shape mismatch, got {other:?}"),
        }
    }

    #[test]
    fn ragged_coefficients_are_rejected() {
        let err = ModelArtifact::from_json(
            r#"{ "kind": "logistic_regression",
                 "coef": [[1.0, 0.0], [1.0]], "intercept": [0.0, 0.0], "classes": [0, 1] }"#,
        )
        .and_then(ModelArtifact::into_classifier)
        .err()
        .unwrap();
        assert!(err.contains("row 1"), "{err}");
    }

    #[test]
    fn class_count_mismatch_is_rejected() {
        let result = ModelArtifact::from_json(
            r#"{ "kind": "logistic_regression",
                 "coef": [[1.0], [1.0]], "intercept": [0.0, 0.0], "classes": [0, 1, 2] }"#,
        )
        .and_then(ModelArtifact::into_classifier);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(ModelArtifact::from_json(r#"{ "kind": "random_forest" }"#).is_err());
    }

    #[test]
    fn load_missing_or_corrupt_artifact() {
        let err = load_classifier(Path::new("/nonexistent/lr_model.json")).err().unwrap();
        assert!(matches!(err, PredictError::ArtifactLoad { .. }));

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("lr_model.json");
        std::fs::write(&path, b"\x80\x04\x95 pickled bytes").unwrap();
        let err = load_classifier(&path).err().unwrap();
        match err {
            PredictError::ArtifactLoad { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected artifact error, got {other:?}"),
        }
    }

    #[test]
    fn empty_parameters_fail_without_panicking() {
        let nb = NaiveBayes {
            class_log_prior: vec![],
            feature_log_prob: vec![],
            classes: vec![],
        };
        assert_eq!(nb.n_features(), 0);
        assert!(matches!(nb.predict(&[]), Err(PredictError::Inference(_))));

        let knn = KNeighbours {
            fit_x: vec![],
            fit_y: vec![],
            n_neighbors: 5,
            weights: Weights::Uniform,
            metric: Metric::Euclidean,
        };
        assert_eq!(knn.n_features(), 0);
        assert!(matches!(knn.predict(&[]), Err(PredictError::Inference(_))));

        let linear = LinearModel {
            coef: vec![],
            intercept: vec![],
            classes: vec![0, 1],
            kind: "logistic regression",
        };
        assert_eq!(linear.n_features(), 0);
        assert!(matches!(linear.predict(&[]), Err(PredictError::Inference(_))));

        // Rows present but the class list is short.
        let short = NaiveBayes {
            class_log_prior: vec![0.0, 0.0],
            feature_log_prob: vec![vec![0.0], vec![1.0]],
            classes: vec![3],
        };
        assert!(matches!(short.predict(&[1.0]), Err(PredictError::Inference(_))));
    }

    #[test]
    fn knn_overflowing_sample_ranks_last() {
        let knn = KNeighbours {
            fit_x: vec![vec![3.0e38, 3.0e38], vec![1.0, 0.0]],
            fit_y: vec![2, 1],
            n_neighbors: 1,
            weights: Weights::Uniform,
            metric: Metric::Cosine,
        };
        // Cosine against the first sample overflows to NaN.
        assert!(knn.distance(&knn.fit_x[0], &[1.0, 1.0]).is_infinite());
        assert_eq!(knn.predict(&[1.0, 1.0]).unwrap(), 1);
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn onnx_artifact_without_feature_fails_to_load() {
        let err = load_classifier(Path::new("models/lr_model.onnx")).err().unwrap();
        assert!(matches!(err, PredictError::ArtifactLoad { .. }));
    }
}
