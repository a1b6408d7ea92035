//! Configuration for the Extractor

use formfill_domain::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use serde::{Deserialize, Serialize};

/// How literal `\n` escape sequences in a model answer are treated before parsing
///
/// Some models double-escape newlines inside an otherwise valid JSON answer.
/// Stripping them rescues those answers but also deletes newlines that belong
/// inside string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewlineHandling {
    /// Always remove `\n` escapes before parsing
    #[default]
    Strip,
    /// Parse the answer as-is; strip `\n` escapes only if that fails
    ParseFirst,
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Sampling temperature sent with each completion
    pub temperature: f64,

    /// Output-token budget for each completion
    pub max_tokens: u32,

    /// Maximum input text length (characters)
    pub max_text_length: usize,

    /// Treatment of literal newline escapes in model output
    pub newline_handling: NewlineHandling,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 2.0 (got {})",
                self.temperature
            ));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_text_length: 200_000,
            newline_handling: NewlineHandling::Strip,
        }
    }
}

impl ExtractorConfig {
    /// Precise preset: fully deterministic sampling
    pub fn precise() -> Self {
        Self {
            temperature: 0.0,
            ..Self::default()
        }
    }

    /// Lenient preset: larger documents and answers, newline-preserving parsing
    pub fn lenient() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: 4_000,
            max_text_length: 1_000_000,
            newline_handling: NewlineHandling::ParseFirst,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
