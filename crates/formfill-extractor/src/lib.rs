//! Formfill Extractor
//!
//! Fills the fields of a form schema from free text using a language model.
//!
//! # Overview
//!
//! A schema lists named, typed fields. The Extractor describes those fields and
//! the document to a model in a single prompt, asks for a flat JSON object, and
//! validates every value it gets back against the declared field type. A value
//! that cannot be coerced is dropped rather than failing the call.
//!
//! # Architecture
//!
//! ```text
//! Schema + Text → PromptBuilder → CompletionProvider → Validator → ExtractionResult
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use formfill_domain::ProviderConfig;
//! use formfill_extractor::{ExtractionRequest, Extractor, ExtractorConfig};
//! use formfill_llm::OpenRouterProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = Extractor::new(OpenRouterProvider::new(), ExtractorConfig::default());
//!
//! let request = ExtractionRequest::from_json_schema(
//!     "Invoice #12 for Jane Doe, total $1,200, paid.",
//!     r#"{"fields": [
//!         {"name": "customer", "type": "text", "label": "Customer"},
//!         {"name": "total", "type": "number", "label": "Total"},
//!         {"name": "paid", "type": "checkbox", "label": "Paid"}
//!     ]}"#,
//!     ProviderConfig::new("sk-or-...", "openai/gpt-4o-mini"),
//! )?;
//!
//! let extraction = extractor.extract(request).await?;
//! println!("{}", extraction.values.to_json());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod catalog;
mod config;
mod error;
mod extractor;
mod prompt;
mod types;
mod validator;


pub use catalog::{fetch_models, filter_models};
pub use config::{ExtractorConfig, NewlineHandling};
pub use error::ProcessingError;
pub use extractor::Extractor;
pub use prompt::PromptBuilder;
pub use types::{Extraction, ExtractionMetadata, ExtractionRequest};
pub use validator::{
    coerce, normalize, revalidate, validate_response, validate_response_with, FieldRejection,
    Rejection, ValidationReport,
};
