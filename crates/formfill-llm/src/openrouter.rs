//! OpenRouter Provider Implementation
//!
//! Talks to an OpenRouter-compatible API: `POST {base}/chat/completions` for
//! extraction and `GET {base}/models` for the model catalog.
//!
//! # Features
//!
//! - Async HTTP communication with bearer authorization
//! - JSON-object response format with low-temperature sampling
//! - Provider error messages surfaced with their status codes
//! - Exactly one request per call (no retries, no client-side timeout)
//!
//! # Examples
//!
//! ```no_run
//! use formfill_domain::{CompletionRequest, ProviderConfig};
//! use formfill_llm::OpenRouterProvider;
//!
//! # async fn example() -> Result<(), formfill_llm::LlmError> {
//! let provider = OpenRouterProvider::new().with_referer("https://example.com");
//! let config = ProviderConfig::new("sk-or-...", "openai/gpt-4o-mini");
//! let raw = provider
//!     .chat_completion(&config, &CompletionRequest::new("Extract...", &config.model))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::LlmError;
use async_trait::async_trait;
use formfill_domain::traits::{CompletionProvider, ModelCatalog};
use formfill_domain::{CompletionRequest, ModelInfo, ModelPricing, ProviderConfig, PRICING_UNAVAILABLE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default OpenRouter API base URL
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default value of the `HTTP-Referer` header identifying the calling origin
pub const DEFAULT_REFERER: &str = "http://localhost";

/// Default value of the `X-Title` header
pub const DEFAULT_APP_TITLE: &str = "formfill";

/// OpenRouter API provider
///
/// Holds no credentials; the key and model arrive with each call.
#[derive(Debug, Clone)]
pub struct OpenRouterProvider {
    base_url: String,
    referer: String,
    app_title: String,
    client: reqwest::Client,
}

/// Request body for the chat-completion API
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Response from the chat-completion API
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error envelope sent with non-success responses
#[derive(Deserialize)]
struct ApiErrorEnvelope {
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

impl ApiErrorBody {
    fn status(&self) -> Option<u16> {
        self.code
            .as_ref()
            .and_then(serde_json::Value::as_u64)
            .and_then(|c| u16::try_from(c).ok())
    }

    fn message(&self) -> Option<String> {
        self.message.clone().filter(|m| !m.trim().is_empty())
    }
}

/// Response from the model-listing API
#[derive(Deserialize)]
struct ModelsResponse {
    data: Vec<RawModel>,
}

#[derive(Deserialize)]
struct RawModel {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    pricing: Option<RawPricing>,
}

#[derive(Deserialize)]
struct RawPricing {
    #[serde(default)]
    prompt: Option<serde_json::Value>,
    #[serde(default)]
    completion: Option<serde_json::Value>,
}

impl From<RawModel> for ModelInfo {
    fn from(raw: RawModel) -> Self {
        let name = raw
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| raw.id.clone());
        let pricing = raw
            .pricing
            .map(|p| ModelPricing {
                prompt: pricing_value(p.prompt),
                completion: pricing_value(p.completion),
            })
            .unwrap_or_default();

        ModelInfo {
            id: raw.id,
            name,
            pricing,
        }
    }
}

fn pricing_value(value: Option<serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => PRICING_UNAVAILABLE.to_string(),
    }
}

impl OpenRouterProvider {
    /// Create a provider for the public OpenRouter endpoint
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a provider for an OpenRouter-compatible endpoint
    ///
    /// # Examples
    ///
    /// ```
    /// use formfill_llm::OpenRouterProvider;
    ///
    /// let provider = OpenRouterProvider::with_base_url("http://127.0.0.1:8080/api/v1/");
    /// assert_eq!(provider.base_url(), "http://127.0.0.1:8080/api/v1");
    /// ```
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            referer: DEFAULT_REFERER.to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Set the origin sent in the `HTTP-Referer` header
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    /// Set the application name sent in the `X-Title` header
    pub fn with_app_title(mut self, app_title: impl Into<String>) -> Self {
        self.app_title = app_title.into();
        self
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a chat-completion request and return the first choice's content
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The key or model is empty (no request is sent)
    /// - The provider cannot be reached
    /// - The provider answers with a non-success status
    /// - The body is not a completion response, or its content is empty
    pub async fn chat_completion(
        &self,
        config: &ProviderConfig,
        request: &CompletionRequest,
    ) -> Result<String, LlmError> {
        config.validate().map_err(LlmError::MissingCredentials)?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request
                .json_response
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        debug!(
            model = %request.model,
            prompt_chars = request.prompt.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&config.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.app_title)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = provider_message(&text).unwrap_or_else(|| {
                format!("API request failed with status {}", status.as_u16())
            });
            warn!(status = status.as_u16(), "Completion request rejected: {}", message);
            return Err(LlmError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        // Some upstream failures arrive as a 200 carrying an error object
        if parsed.choices.is_empty() {
            if let Some(error) = parsed.error {
                return Err(LlmError::Provider {
                    status: error.status().unwrap_or(status.as_u16()),
                    message: error
                        .message()
                        .unwrap_or_else(|| "Provider returned an error".to_string()),
                });
            }
        }

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyCompletion)?;

        debug!(response_chars = content.len(), "Received completion");
        Ok(content)
    }

    /// List the models available from the provider
    ///
    /// Names fall back to the model id, and unpublished pricing to `"N/A"`.
    pub async fn fetch_models(&self, api_key: &str) -> Result<Vec<ModelInfo>, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingCredentials(
                "API key must not be empty".to_string(),
            ));
        }

        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .send()
            .await
            .map_err(|e| LlmError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Provider {
                status: status.as_u16(),
                message: format!(
                    "Failed to fetch models: {}",
                    status.canonical_reason().unwrap_or("unknown status")
                ),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(format!("Failed to read response body: {}", e)))?;
        let parsed: ModelsResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse model list: {}", e)))?;

        debug!(count = parsed.data.len(), "Fetched model catalog");
        Ok(parsed.data.into_iter().map(ModelInfo::from).collect())
    }
}

impl Default for OpenRouterProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn provider_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message())
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    type Error = LlmError;

    async fn complete(
        &self,
        config: &ProviderConfig,
        request: &CompletionRequest,
    ) -> Result<String, Self::Error> {
        self.chat_completion(config, request).await
    }
}

#[async_trait]
impl ModelCatalog for OpenRouterProvider {
    type Error = LlmError;

    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>, Self::Error> {
        self.fetch_models(api_key).await
    }
}
