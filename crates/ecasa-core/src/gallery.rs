//! Catalog of the pre-rendered EDA images.
//!
//! The images are produced offline; this module only knows where they live
//! under `Visuals/` and which sentiment each one belongs to.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::{CoreError, Sentiment};

const VISUALS_DIR: &str = "Visuals";

/// Order in which per-sentiment images are presented.
pub const GALLERY_ORDER: [Sentiment; 4] = [
    Sentiment::Pro,
    Sentiment::News,
    Sentiment::Neutral,
    Sentiment::Anti,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visualization {
    /// Word clouds of the most common words.
    CommonWords,
    PopularHashtags,
    /// Named entities most frequently mentioned.
    TopEntities,
    /// Class counts of the raw training data.
    SentimentDistribution,
    /// Class counts after resampling.
    BalancedDistribution,
}

impl Visualization {
    pub const ALL: [Visualization; 5] = [
        Visualization::CommonWords,
        Visualization::PopularHashtags,
        Visualization::TopEntities,
        Visualization::SentimentDistribution,
        Visualization::BalancedDistribution,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::CommonWords => "common-words",
            Self::PopularHashtags => "popular-hashtags",
            Self::TopEntities => "top-entities",
            Self::SentimentDistribution => "sentiment-distribution",
            Self::BalancedDistribution => "balanced-distribution",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::CommonWords => "Common words",
            Self::PopularHashtags => "Popular hashtags",
            Self::TopEntities => "Top entities",
            Self::SentimentDistribution => "Unbalanced data",
            Self::BalancedDistribution => "Balanced data",
        }
    }

    /// Whether the image belongs to the feature-engineering section rather
    /// than exploratory analysis.
    pub fn is_feature_engineering(&self) -> bool {
        matches!(
            self,
            Self::SentimentDistribution | Self::BalancedDistribution
        )
    }

    /// Path of the all-sentiment image, relative to the resources directory.
    pub fn overview(&self) -> PathBuf {
        let file = match self {
            Self::CommonWords => "word_cloud_most_common_words.png",
            Self::PopularHashtags => "most_common_hashtags.png",
            Self::TopEntities => "top_entities.png",
            Self::SentimentDistribution => "sentiment_distribution.png",
            Self::BalancedDistribution => "balanced_distribution.png",
        };
        PathBuf::from(VISUALS_DIR).join(file)
    }

    /// Per-sentiment images in [`GALLERY_ORDER`]. Empty for the distribution
    /// charts, which already cover every class.
    pub fn by_sentiment(&self) -> Vec<(Sentiment, PathBuf)> {
        GALLERY_ORDER
            .iter()
            .filter_map(|s| self.sentiment_file(*s).map(|f| (*s, PathBuf::from(VISUALS_DIR).join(f))))
            .collect()
    }

    fn sentiment_file(&self, sentiment: Sentiment) -> Option<String> {
        let slug = sentiment.slug();
        match self {
            Self::CommonWords => Some(format!("word_cloud_most_common_words_{slug}.png")),
            Self::PopularHashtags => Some(format!("most_common_hashtags_{slug}.png")),
            // The pro-sentiment entity chart was exported with a misspelled name.
            Self::TopEntities if sentiment == Sentiment::Pro => {
                Some("top_enities_pro.png".to_string())
            }
            Self::TopEntities => Some(format!("top_entities_{slug}.png")),
            Self::SentimentDistribution | Self::BalancedDistribution => None,
        }
    }
}

impl fmt::Display for Visualization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Visualization {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|v| v.slug().eq_ignore_ascii_case(s) || v.title().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownVisualization(s.to_string()))
    }
}
