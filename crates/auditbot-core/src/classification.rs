//! Classification result shared by every classification path

use serde::{Deserialize, Serialize};

/// Outcome of classifying a single chat message.
///
/// The remote and the heuristic paths both produce this exact shape, so code
/// aggregating results never needs to know which path produced a row. Remote
/// values are free text and are kept as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub sentiment: String,
    pub rudeness_flag: String,
    pub recommendation: String,
}

impl ClassificationResult {
    pub const SENTIMENT_POSITIVE: &'static str = "Positive";
    pub const SENTIMENT_NEUTRAL: &'static str = "Neutral";
    pub const SENTIMENT_VERY_NEGATIVE: &'static str = "Very Negative";
    pub const SENTIMENT_NOT_AVAILABLE: &'static str = "N/A";

    pub const FLAG_YES: &'static str = "Yes";
    pub const FLAG_NO: &'static str = "No";

    pub fn new(
        sentiment: impl Into<String>,
        rudeness_flag: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            sentiment: sentiment.into(),
            rudeness_flag: rudeness_flag.into(),
            recommendation: recommendation.into(),
        }
    }

    /// Result returned for empty or whitespace-only messages
    pub fn sentinel() -> Self {
        Self::new(Self::SENTIMENT_NOT_AVAILABLE, Self::FLAG_NO, "No text")
    }

    /// Whether the sentiment label denotes a negative message.
    ///
    /// Matches "Negative", "Very Negative" and the Spanish "Negativo" forms a
    /// remote model may answer with.
    pub fn is_negative(&self) -> bool {
        self.sentiment.to_lowercase().contains("negativ")
    }

    /// Whether the rudeness flag is set (`Yes`, `Si` or `Sí`, any case)
    pub fn is_rude(&self) -> bool {
        matches!(
            self.rudeness_flag.trim().to_lowercase().as_str(),
            "yes" | "si" | "sí"
        )
    }
}

/// Which path produced a [`ClassificationResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    /// Empty input, no classifier consulted
    Sentinel,
    /// Remote LLM answer
    Remote,
    /// Local keyword fallback
    Heuristic,
}

impl std::fmt::Display for ClassificationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Sentinel => "sentinel",
            Self::Remote => "remote",
            Self::Heuristic => "heuristic",
        };
        f.write_str(name)
    }
}
