//! Keyword-driven fallback classifier used when remote classification is unavailable

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use auditbot_core::{ClassificationResult, Error, Result};

pub const RECOMMEND_URGENT_REVIEW: &str = "Urgent review (keyword-detected)";
pub const RECOMMEND_RESPOND_QUICKLY: &str = "Respond to customer quickly";
pub const RECOMMEND_COMMEND_AGENT: &str = "Commend agent";
pub const RECOMMEND_MONITOR: &str = "Monitor";

/// Keyword lists driving the fallback rules.
///
/// Missing lists in a rules file keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordRules {
    /// Complaint or hostile phrases; any hit flags the message as rude
    pub negative: Vec<String>,
    /// Phrases showing the customer is waiting on an answer
    pub inquiry: Vec<String>,
    /// Praise phrases
    pub praise: Vec<String>,
}

impl Default for KeywordRules {
    fn default() -> Self {
        let to_vec = |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };

        Self {
            negative: to_vec(&[
                "inútiles", "inutiles", "moleste", "no me interesa", "lento",
                "pésimo", "tonto", "culpa", "no sirve",
                "useless", "don't bother", "not interested", "slow",
                "terrible", "stupid", "fault", "doesn't work",
            ]),
            inquiry: to_vec(&["precio", "cuanto", "price", "how much"]),
            praise: to_vec(&["gracias", "excelente", "bien", "thanks", "excellent", "good"]),
        }
    }
}

impl KeywordRules {
    /// Load rules from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .await
            .map_err(Error::Io)?;

        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let rules: KeywordRules = serde_json::from_str(content)?;
        Ok(rules)
    }

    fn lowercased(mut self) -> Self {
        for list in [&mut self.negative, &mut self.inquiry, &mut self.praise] {
            list.retain(|w| !w.trim().is_empty());
            for word in list.iter_mut() {
                *word = word.to_lowercase();
            }
        }
        self
    }
}

/// Deterministic keyword classifier.
///
/// Rules are checked in a fixed order and the first match wins:
/// negative keyword, then inquiry (`?` or an inquiry keyword), then praise,
/// then the neutral default.
#[derive(Debug, Clone, Default)]
pub struct HeuristicClassifier {
    rules: KeywordRules,
}

impl HeuristicClassifier {
    pub fn new(rules: KeywordRules) -> Self {
        Self {
            rules: rules.lowercased(),
        }
    }

    pub fn rules(&self) -> &KeywordRules {
        &self.rules
    }

    /// Classify a message. Matching is plain substring search on a
    /// lower-cased copy; this never fails.
    pub fn classify_fallback(&self, message: &str) -> ClassificationResult {
        let message_lower = message.to_lowercase();
        let contains_any = |words: &[String]| words.iter().any(|w| message_lower.contains(w.as_str()));

        if contains_any(&self.rules.negative) {
            ClassificationResult::new(
                ClassificationResult::SENTIMENT_VERY_NEGATIVE,
                ClassificationResult::FLAG_YES,
                RECOMMEND_URGENT_REVIEW,
            )
        } else if message_lower.contains('?') || contains_any(&self.rules.inquiry) {
            ClassificationResult::new(
                ClassificationResult::SENTIMENT_NEUTRAL,
                ClassificationResult::FLAG_NO,
                RECOMMEND_RESPOND_QUICKLY,
            )
        } else if contains_any(&self.rules.praise) {
            ClassificationResult::new(
                ClassificationResult::SENTIMENT_POSITIVE,
                ClassificationResult::FLAG_NO,
                RECOMMEND_COMMEND_AGENT,
            )
        } else {
            ClassificationResult::new(
                ClassificationResult::SENTIMENT_NEUTRAL,
                ClassificationResult::FLAG_NO,
                RECOMMEND_MONITOR,
            )
        }
    }
}
