//! Error types for the extraction pipeline

use formfill_domain::SchemaError;
use formfill_llm::LlmError;
use thiserror::Error;

/// Errors that abort an extraction call
///
/// Per-field coercion misses are not errors; they only drop the field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessingError {
    /// Schema input violates its invariants
    #[error("Invalid schema: {0}")]
    SchemaFormat(#[from] SchemaError),

    /// Provider or extractor configuration is incomplete or out of range
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Document text exceeds the configured maximum
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Document text is empty
    #[error("Document text is empty")]
    EmptyDocument,

    /// Network failure reaching the provider
    #[error("Failed to reach the completion service: {0}")]
    Transport(String),

    /// Provider answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Provider {
        /// HTTP status code
        status: u16,
        /// Provider message
        message: String,
    },

    /// Completion carried no content
    #[error("Empty response from API")]
    EmptyCompletion,

    /// Completion payload is not a parseable JSON object
    #[error("Failed to parse API response: {0}")]
    ResponseFormat(String),
}

impl ProcessingError {
    /// HTTP status reported by the provider, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProcessingError::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<LlmError> for ProcessingError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Transport(msg) => ProcessingError::Transport(msg),
            LlmError::Provider { status, message } => ProcessingError::Provider { status, message },
            LlmError::EmptyCompletion => ProcessingError::EmptyCompletion,
            LlmError::InvalidResponse(msg) => ProcessingError::ResponseFormat(msg),
            LlmError::MissingCredentials(msg) => ProcessingError::Configuration(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_mapping() {
        let err: ProcessingError = LlmError::Provider { status: 402, message: "Insufficient credits".into() }.into();
        assert_eq!(err.status_code(), Some(402));
        assert_eq!(err.to_string(), "Insufficient credits (HTTP 402)");

        let err: ProcessingError = LlmError::Transport("connection refused".into()).into();
        assert!(matches!(err, ProcessingError::Transport(_)));
        assert_eq!(err.status_code(), None);

        let err: ProcessingError = LlmError::InvalidResponse("bad body".into()).into();
        assert!(matches!(err, ProcessingError::ResponseFormat(_)));

        let err: ProcessingError = LlmError::MissingCredentials("no key".into()).into();
        assert!(matches!(err, ProcessingError::Configuration(_)));
    }

    #[test]
    fn test_schema_error_mapping() {
        let err: ProcessingError = SchemaError::MissingFields.into();
        assert_eq!(err.to_string(), "Invalid schema: Invalid JSON format: missing fields array");
    }
}
