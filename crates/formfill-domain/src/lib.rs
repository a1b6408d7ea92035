//! Formfill Domain Layer
//!
//! This crate contains the typed field contract that every other layer depends on.
//! It defines what a schema is, what a validated field value looks like, and the
//! trait interfaces implemented by the infrastructure crates.
//!
//! ## Key Concepts
//!
//! - **Field**: one named, typed slot with an optional allowed-value set
//! - **Schema**: ordered set of fields, keyed by unique name
//! - **FieldValue**: tagged union of the values a field may hold
//! - **ExtractionResult**: partial mapping of field name to validated value
//! - **ProviderConfig**: explicit credentials and model, never ambient state
//!
//! ## Architecture
//!
//! - No I/O, no network
//! - Infrastructure implementations live in other crates (`formfill-llm`)
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod field;
pub mod provider;
pub mod result;
pub mod schema;
pub mod traits;

// Re-exports for convenience
pub use field::{Field, FieldType, FieldValue};
pub use provider::{
    CompletionRequest, ModelInfo, ModelPricing, ProviderConfig, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE, PRICING_UNAVAILABLE,
};
pub use result::ExtractionResult;
pub use schema::{Schema, SchemaError};
