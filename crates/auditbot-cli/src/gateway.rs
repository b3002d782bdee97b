//! Classifier gateway: remote LLM classification with a keyword fallback

use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

use auditbot_core::{
    ClassificationResult, ClassificationSource, Error, GenerationConfig, LLMProvider,
};
use auditbot_gemini::{GeminiClient, GeminiConfig};

use crate::heuristic::HeuristicClassifier;
use crate::response::{parse_classification, ResponseParseError};

/// Default bound on a single remote classification
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure of the remote path. Never leaves the gateway; every variant
/// sends the message to the heuristic classifier.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("provider failed: {0}")]
    Provider(#[from] Error),

    #[error("malformed response: {0}")]
    Malformed(#[from] ResponseParseError),

    #[error("no answer within {0:?}")]
    Timeout(Duration),
}

/// Gateway backed by the Gemini client
pub type GeminiGateway = ClassifierGateway<GeminiClient>;

/// Classifies chat messages, preferring the remote LLM and degrading to the
/// local keyword rules. Classification never fails.
pub struct ClassifierGateway<L: LLMProvider> {
    llm: Option<L>,
    heuristic: HeuristicClassifier,
    remote_timeout: Duration,
}

impl<L: LLMProvider> ClassifierGateway<L> {
    /// Create a gateway; `llm` must already be connected
    pub fn new(llm: Option<L>, heuristic: HeuristicClassifier) -> Self {
        Self {
            llm,
            heuristic,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    /// Gateway that only ever uses the keyword rules
    pub fn offline(heuristic: HeuristicClassifier) -> Self {
        Self::new(None, heuristic)
    }

    pub fn with_timeout(mut self, remote_timeout: Duration) -> Self {
        self.remote_timeout = remote_timeout;
        self
    }

    /// Whether remote classification will be attempted
    pub fn has_remote(&self) -> bool {
        self.llm.is_some()
    }

    /// Model used by the remote path, if any
    pub fn model_id(&self) -> Option<&str> {
        self.llm.as_ref().map(|llm| llm.model_id())
    }

    pub fn heuristic(&self) -> &HeuristicClassifier {
        &self.heuristic
    }

    /// Classify one message
    pub async fn classify(&self, message: &str) -> ClassificationResult {
        self.classify_with_source(message).await.0
    }

    /// Classify one message and report which path produced the result
    pub async fn classify_with_source(
        &self,
        message: &str,
    ) -> (ClassificationResult, ClassificationSource) {
        let message = message.trim();
        if message.is_empty() {
            return (ClassificationResult::sentinel(), ClassificationSource::Sentinel);
        }

        if let Some(llm) = &self.llm {
            match self.classify_remote(llm, message).await {
                Ok(result) => return (result, ClassificationSource::Remote),
                Err(e) => {
                    tracing::warn!(error = %e, "remote classification failed, using keyword rules");
                }
            }
        }

        (
            self.heuristic.classify_fallback(message),
            ClassificationSource::Heuristic,
        )
    }

    async fn classify_remote(&self, llm: &L, message: &str) -> Result<ClassificationResult, RemoteError> {
        let prompt = build_prompt(message);
        let config = GenerationConfig {
            model_id: llm.model_id().to_string(),
            max_tokens: 100,
            timeout: self.remote_timeout,
            ..Default::default()
        };

        let generation = timeout(self.remote_timeout, llm.generate_with_config(&prompt, &config))
            .await
            .map_err(|_| RemoteError::Timeout(self.remote_timeout))??;

        tracing::debug!(answer = %generation.text, "remote classification answer");

        Ok(parse_classification(&generation.text)?)
    }
}

impl GeminiGateway {
    /// Build a gateway from an optional API key.
    ///
    /// A missing, blank or placeholder key gives an offline gateway, as does a
    /// client that cannot be set up.
    pub async fn from_credential(
        credential: Option<&str>,
        heuristic: HeuristicClassifier,
    ) -> Self {
        match credential.filter(|key| GeminiConfig::is_usable_key(key)) {
            Some(key) => Self::from_config(GeminiConfig::new(key.trim()), heuristic).await,
            None => Self::offline(heuristic),
        }
    }

    /// Build a gateway from a full Gemini configuration
    pub async fn from_config(config: GeminiConfig, heuristic: HeuristicClassifier) -> Self {
        let mut client = match GeminiClient::new(config) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(error = %e, "could not create Gemini client, running offline");
                return Self::offline(heuristic);
            }
        };

        match client.connect().await {
            Ok(()) => Self::new(Some(client), heuristic),
            Err(e) => {
                tracing::warn!(error = %e, "could not connect to Gemini, running offline");
                Self::offline(heuristic)
            }
        }
    }
}

/// Classify a single message with the default keyword rules.
///
/// Tries Gemini when `credential` is a usable key; otherwise, or on any
/// remote failure, answers from the keyword rules.
pub async fn classify(message: &str, credential: Option<&str>) -> ClassificationResult {
    let message = message.trim();
    if message.is_empty() {
        return ClassificationResult::sentinel();
    }

    GeminiGateway::from_credential(credential, HeuristicClassifier::default())
        .await
        .classify(message)
        .await
}

/// Prompt asking for exactly three pipe-delimited fields
pub fn build_prompt(message: &str) -> String {
    format!(
        "Analyze this customer-service chat message: \"{}\".\n\
        Answer ONLY in this format, separated by pipes (|):\n\
        SENTIMENT (Positive/Neutral/Negative) | RUDENESS (Yes/No) | SHORT_RECOMMENDATION",
        message
    )
}
