//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ProcessingError;
use crate::prompt::PromptBuilder;
use crate::types::{Extraction, ExtractionMetadata, ExtractionRequest};
use crate::validator::validate_response_with;
use formfill_domain::traits::CompletionProvider;
use formfill_domain::CompletionRequest;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// The Extractor fills a schema's fields from free text through one completion call
pub struct Extractor<P>
where
    P: CompletionProvider,
{
    provider: Arc<P>,
    config: ExtractorConfig,
}

impl<P> Extractor<P>
where
    P: CompletionProvider + Send + Sync,
    P::Error: Into<ProcessingError>,
{
    /// Create a new Extractor
    pub fn new(provider: P, config: ExtractorConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
        }
    }

    /// Create an Extractor that shares a provider with other callers
    pub fn from_shared(provider: Arc<P>, config: ExtractorConfig) -> Self {
        Self { provider, config }
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Underlying completion provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Extract field values from a document
    ///
    /// Makes exactly one completion call. Fails before any network traffic when
    /// the credentials, the configuration or the document are unusable.
    pub async fn extract(&self, request: ExtractionRequest) -> Result<Extraction, ProcessingError> {
        let start = Instant::now();
        let request_id = Uuid::now_v7();

        request
            .provider
            .validate()
            .map_err(ProcessingError::Configuration)?;
        self.config.validate().map_err(ProcessingError::Configuration)?;

        if request.text.is_empty() {
            return Err(ProcessingError::EmptyDocument);
        }
        let text_chars = request.text.chars().count();
        if text_chars > self.config.max_text_length {
            return Err(ProcessingError::TextTooLong(
                text_chars,
                self.config.max_text_length,
            ));
        }

        info!(
            %request_id,
            model = %request.provider.model,
            fields = request.schema.len(),
            text_chars,
            "Starting extraction"
        );

        let prompt = PromptBuilder::new(&request.schema, &request.text).build();
        debug!("Prompt length: {} chars", prompt.len());

        let completion = CompletionRequest::new(prompt, request.provider.model.clone())
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens);

        let response = self
            .provider
            .complete(&request.provider, &completion)
            .await
            .map_err(Into::into)?;

        debug!("Completion length: {} chars", response.len());

        let report = validate_response_with(&response, &request.schema, self.config.newline_handling)?;

        let metadata = ExtractionMetadata {
            request_id,
            model: request.provider.model.clone(),
            fields_requested: request.schema.len(),
            fields_extracted: report.result.len(),
            rejected: report.rejected.iter().map(|r| r.field.clone()).collect(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            %request_id,
            "Extraction complete: {} of {} fields extracted, {} rejected",
            metadata.fields_extracted,
            metadata.fields_requested,
            metadata.rejected.len()
        );

        Ok(Extraction {
            values: report.result,
            metadata,
        })
    }
}
