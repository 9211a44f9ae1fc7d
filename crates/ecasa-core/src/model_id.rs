//! Stable identifiers for the pre-trained classifiers offered to the user.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// A classifier the user can pick from the model dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelId {
    LogisticRegression,
    SupportVector,
    NaiveBayes,
    KNeighbours,
}

impl ModelId {
    pub const ALL: [ModelId; 4] = [
        ModelId::LogisticRegression,
        ModelId::SupportVector,
        ModelId::NaiveBayes,
        ModelId::KNeighbours,
    ];

    /// Name shown in the model dropdown and used as the config key.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LogisticRegression => "Logistic Regression",
            Self::SupportVector => "Support Vector Classifier",
            Self::NaiveBayes => "Naive Bayes Classifier",
            Self::KNeighbours => "KNeighbours Classifier",
        }
    }

    /// Short command-line alias.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::LogisticRegression => "lr",
            Self::SupportVector => "svc",
            Self::NaiveBayes => "nb",
            Self::KNeighbours => "knn",
        }
    }

    /// Artifact location relative to the resources directory.
    pub fn default_artifact(&self) -> &'static str {
        match self {
            Self::LogisticRegression => "Models/lr_model.json",
            Self::SupportVector => "Models/svc_model.json",
            Self::NaiveBayes => "Models/nb_model.json",
            Self::KNeighbours => "Models/knn_model.json",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ModelId {
    type Err = CoreError;

    /// Accepts the display name (any case) or the slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.display_name().eq_ignore_ascii_case(s) || id.slug().eq_ignore_ascii_case(s))
            .or_else(|| {
                // US spelling of the KNN dropdown entry.
                s.eq_ignore_ascii_case("KNeighbors Classifier")
                    .then_some(Self::KNeighbours)
            })
            .ok_or_else(|| CoreError::InvalidModelSelection(s.to_string()))
    }
}
