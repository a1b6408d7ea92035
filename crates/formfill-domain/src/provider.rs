//! Provider-facing value types: credentials, completion requests, model descriptors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used when a provider does not publish pricing for a model
pub const PRICING_UNAVAILABLE: &str = "N/A";

/// Default sampling temperature for extraction (near-deterministic)
pub const DEFAULT_TEMPERATURE: f64 = 0.1;

/// Default output-token budget for a completion
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Credentials and model selection for the completion service
///
/// Passed explicitly into every call rather than read from the environment.
/// The `Debug` output never includes the key.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Opaque bearer credential
    pub api_key: String,

    /// Selected model identifier
    pub model: String,
}

impl ProviderConfig {
    /// Create a provider configuration
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Validate that both the key and the model are present
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("API key must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("Please select a model first".to_string());
        }
        Ok(())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// A single completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Prompt sent as the only user message
    pub prompt: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f64,

    /// Output-token budget
    pub max_tokens: u32,

    /// Ask the provider for a JSON-object-formatted answer
    pub json_response: bool,
}

impl CompletionRequest {
    /// Create a JSON-mode request with the default sampling parameters
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            json_response: true,
        }
    }

    /// Override the sampling temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the output-token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Unit pricing for a model, as published by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Price per prompt token
    pub prompt: String,

    /// Price per completion token
    pub completion: String,
}

impl Default for ModelPricing {
    fn default() -> Self {
        Self {
            prompt: PRICING_UNAVAILABLE.to_string(),
            completion: PRICING_UNAVAILABLE.to_string(),
        }
    }
}

/// A model available from the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier used in completion requests
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Published pricing
    pub pricing: ModelPricing,
}

impl ModelInfo {
    /// Create a descriptor without published pricing
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pricing: ModelPricing::default(),
        }
    }
}
