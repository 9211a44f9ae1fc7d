//! Sentiment labels and the class-code mapping shared by every classifier.
//!
//! The upstream training set encodes climate-change stance as an integer:
//! `-1` anti, `0` neutral, `1` pro, `2` news. Any other code a model emits is
//! kept as [`Sentiment::Unknown`] so callers can see it instead of having it
//! folded into one of the real classes.

use std::fmt;

/// Human-readable stance of a tweet towards man-made climate change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Anti,
    Neutral,
    Pro,
    News,
    /// A class code outside the trained label set.
    Unknown(i64),
}

impl Sentiment {
    /// The four labels a well-formed classifier can produce, in code order.
    pub const KNOWN: [Sentiment; 4] = [
        Sentiment::Anti,
        Sentiment::Neutral,
        Sentiment::Pro,
        Sentiment::News,
    ];

    /// Map a class code to its label. Total: unmapped codes become `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            -1 => Self::Anti,
            0 => Self::Neutral,
            1 => Self::Pro,
            2 => Self::News,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Anti => -1,
            Self::Neutral => 0,
            Self::Pro => 1,
            Self::News => 2,
            Self::Unknown(code) => *code,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anti => "Anti",
            Self::Neutral => "Neutral",
            Self::Pro => "Pro",
            Self::News => "News",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Lowercase slug used in artifact file names (`..._pro.png`).
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Anti => "anti",
            Self::Neutral => "neutral",
            Self::Pro => "pro",
            Self::News => "news",
            Self::Unknown(_) => "unknown",
        }
    }

    /// One-sentence explanation shown next to the label.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Anti => "The tweet does not believe in man-made climate change",
            Self::Neutral => {
                "The tweet neither supports nor refutes the belief of man-made climate change"
            }
            Self::Pro => "The tweet supports the belief of man-made climate change",
            Self::News => "The tweet links to factual news about climate change",
            Self::Unknown(_) => "The model produced a class code outside the trained label set",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "Unknown ({code})"),
            other => f.write_str(other.as_str()),
        }
    }
}
