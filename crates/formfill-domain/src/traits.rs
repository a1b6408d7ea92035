//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::provider::{CompletionRequest, ModelInfo, ProviderConfig};
use async_trait::async_trait;

/// Trait for text-completion services
///
/// Implemented by the infrastructure layer (formfill-llm). One call is one
/// network round trip; implementations do not retry.
#[async_trait]
pub trait CompletionProvider {
    /// Error type for completion operations
    type Error;

    /// Send a prompt and return the raw text of the first completion choice
    async fn complete(
        &self,
        config: &ProviderConfig,
        request: &CompletionRequest,
    ) -> Result<String, Self::Error>;
}

/// Trait for listing the models a provider offers
///
/// Implemented by the infrastructure layer (formfill-llm)
#[async_trait]
pub trait ModelCatalog {
    /// Error type for catalog operations
    type Error;

    /// List available models in provider order
    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>, Self::Error>;
}
