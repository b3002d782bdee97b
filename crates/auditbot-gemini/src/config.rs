//! Gemini configuration

use serde::{Deserialize, Serialize};
use std::env;
use auditbot_core::{Error, Result, llm::DEFAULT_MODEL};

/// Literal left in shipped configuration files in place of a real key.
/// It is treated exactly like a missing key and never sent anywhere.
pub const PLACEHOLDER_API_KEY: &str = "PON_TU_API_KEY_AQUI";

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for the Gemini client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_url: String,
    pub model_id: String,
}

impl GeminiConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .map_err(|_| Error::Configuration(
                "GEMINI_API_KEY or API_KEY environment variable not found".to_string()
            ))?;

        if !Self::is_usable_key(&api_key) {
            return Err(Error::Configuration(
                "API key is blank or still set to the placeholder value".to_string()
            ));
        }

        let api_url = env::var("GEMINI_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model_id = env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            api_url,
            model_id,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            model_id: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Whether a key may be sent to the remote service at all
    pub fn is_usable_key(api_key: &str) -> bool {
        let trimmed = api_key.trim();
        !trimmed.is_empty() && trimmed != PLACEHOLDER_API_KEY
    }
}
