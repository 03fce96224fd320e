//! Language model configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Language model configuration for the OpenAI-compatible provider
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for the completions endpoint
    pub api_key: Option<SecretString>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Budget for the crisis classifier race in seconds
    #[serde(default = "default_classify_timeout")]
    pub classify_timeout_secs: u64,

    /// Temperature for the single structured-output retry
    #[serde(default = "default_retry_temperature")]
    pub retry_temperature: f32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get classify timeout as Duration
    pub fn classify_timeout(&self) -> Duration {
        Duration::from_secs(self.classify_timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate language model configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("AI__API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.classify_timeout_secs == 0 || self.classify_timeout_secs > self.timeout_secs {
            return Err(ValidationError::InvalidClassifyTimeout);
        }
        if !(0.0..=2.0).contains(&self.retry_temperature) {
            return Err(ValidationError::InvalidRetryTemperature);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            classify_timeout_secs: default_classify_timeout(),
            retry_temperature: default_retry_temperature(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_classify_timeout() -> u64 {
    5
}

fn default_retry_temperature() -> f32 {
    0.5
}
