//! Formfill LLM Provider Layer
//!
//! Implementations of the `CompletionProvider` and `ModelCatalog` traits from
//! `formfill-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenRouterProvider`: OpenRouter-compatible chat-completion API
//!
//! # Examples
//!
//! ```
//! use formfill_domain::traits::CompletionProvider;
//! use formfill_domain::{CompletionRequest, ProviderConfig};
//! use formfill_llm::MockProvider;
//!
//! # async fn example() {
//! let provider = MockProvider::new(r#"{"age": 37}"#);
//! let config = ProviderConfig::new("sk-test", "test/model");
//! let request = CompletionRequest::new("prompt", "test/model");
//! let raw = provider.complete(&config, &request).await.unwrap();
//! assert_eq!(raw, r#"{"age": 37}"#);
//! # }
//! ```

#![warn(missing_docs)]

pub mod openrouter;

use async_trait::async_trait;
use formfill_domain::traits::{CompletionProvider, ModelCatalog};
use formfill_domain::{CompletionRequest, ModelInfo, ProviderConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use openrouter::{OpenRouterProvider, DEFAULT_APP_TITLE, DEFAULT_BASE_URL, DEFAULT_REFERER};

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network failure reaching the provider
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Provider {
        /// HTTP status code
        status: u16,
        /// Provider's message, or a generic one when none was sent
        message: String,
    },

    /// Completion carried no content
    #[error("Empty response from API")]
    EmptyCompletion,

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Key or model missing before any request was made
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

impl LlmError {
    /// HTTP status reported by the provider, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
///
/// # Examples
///
/// ```
/// use formfill_llm::{LlmError, MockProvider};
///
/// // Simple fixed response
/// let provider = MockProvider::new(r#"{"name": "Alice"}"#);
///
/// // Per-prompt responses and errors
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "{}");
/// provider.add_error("prompt2", LlmError::EmptyCompletion);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, Result<String, LlmError>>>>,
    models: Vec<ModelInfo>,
    failure: Option<LlmError>,
    call_count: Arc<Mutex<usize>>,
    last_request: Arc<Mutex<Option<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            models: Vec::new(),
            failure: None,
            call_count: Arc::new(Mutex::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a provider whose every call fails with `error`
    pub fn failing(error: LlmError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Set the models returned by `list_models`
    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.models = models;
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), Ok(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>, error: LlmError) {
        lock(&self.responses).insert(prompt.into(), Err(error));
    }

    /// Get the number of completion and listing calls made
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *lock(&self.call_count) = 0;
    }

    /// The most recent completion request received
    pub fn last_request(&self) -> Option<CompletionRequest> {
        lock(&self.last_request).clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    type Error = LlmError;

    async fn complete(
        &self,
        _config: &ProviderConfig,
        request: &CompletionRequest,
    ) -> Result<String, Self::Error> {
        *lock(&self.call_count) += 1;
        *lock(&self.last_request) = Some(request.clone());

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        // Check if we have a specific response for this prompt
        if let Some(response) = lock(&self.responses).get(&request.prompt) {
            return response.clone();
        }

        Ok(self.default_response.clone())
    }
}

#[async_trait]
impl ModelCatalog for MockProvider {
    type Error = LlmError;

    async fn list_models(&self, _api_key: &str) -> Result<Vec<ModelInfo>, Self::Error> {
        *lock(&self.call_count) += 1;

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(self.models.clone())
    }
}
