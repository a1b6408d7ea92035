//! Request and response types for extraction

use formfill_domain::{ExtractionResult, ProviderConfig, Schema};
use serde::Serialize;
use uuid::Uuid;

/// Request to extract field values from a document
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Document text, sent to the model verbatim
    pub text: String,

    /// Fields to fill
    pub schema: Schema,

    /// Credentials and model for this call
    pub provider: ProviderConfig,
}

impl ExtractionRequest {
    /// Create a new request
    pub fn new(text: impl Into<String>, schema: Schema, provider: ProviderConfig) -> Self {
        Self {
            text: text.into(),
            schema,
            provider,
        }
    }

    /// Create a request from a schema document in JSON form
    pub fn from_json_schema(
        text: impl Into<String>,
        schema_json: &str,
        provider: ProviderConfig,
    ) -> Result<Self, crate::ProcessingError> {
        let schema = Schema::from_json(schema_json)?;
        Ok(Self::new(text, schema, provider))
    }
}

/// Result of an extraction call
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// Validated values in schema order
    pub values: ExtractionResult,

    /// Metadata about the call
    pub metadata: ExtractionMetadata,
}

/// Metadata about an extraction call
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionMetadata {
    /// Identifier for correlating log lines with this call
    pub request_id: Uuid,

    /// Model that produced the answer
    pub model: String,

    /// Number of fields in the schema
    pub fields_requested: usize,

    /// Number of fields with an accepted value
    pub fields_extracted: usize,

    /// Fields the model answered whose values were dropped
    pub rejected: Vec<String>,

    /// Wall-clock time for the call
    pub processing_time_ms: u64,
}
