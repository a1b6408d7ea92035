//! LLM prompt engineering for schema-driven field extraction

use formfill_domain::{Field, FieldType, Schema};

/// Builds the extraction prompt for a schema and a document
///
/// Pure function of its inputs: the same schema and text always yield the same
/// prompt.
pub struct PromptBuilder<'a> {
    schema: &'a Schema,
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(schema: &'a Schema, text: &'a str) -> Self {
        Self { schema, text }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Role and answer format
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Field list
        prompt.push_str("Fields to extract:\n");
        for field in self.schema {
            prompt.push_str(&describe_field(field));
            prompt.push('\n');
        }
        prompt.push('\n');

        // 3. The document, verbatim
        prompt.push_str("Text content:\n");
        prompt.push_str(self.text);
        prompt.push_str("\n\n");

        // 4. Formatting rules
        prompt.push_str(FORMAT_RULES);

        prompt
    }
}

/// One line per field: `name (type)` or `name (select, options: [a, b])`
fn describe_field(field: &Field) -> String {
    if field.field_type == FieldType::Select {
        format!(
            "{} ({}, options: [{}])",
            field.name,
            field.field_type,
            field.options.join(", ")
        )
    } else {
        format!("{} ({})", field.name, field.field_type)
    }
}

const EXTRACTION_INSTRUCTIONS: &str = "You are a document parser. Extract information from the text below and provide values for the specified fields.
Respond ONLY with a valid JSON object containing the extracted values.";

const FORMAT_RULES: &str = r#"Rules:
- Keys must match the field names exactly
- Values must match the specified type for each field
- For select fields, values must be one of the provided options
- For checkbox fields, values must be true or false
- For number fields, values must be numeric
- For text fields, values must be strings
- If a value cannot be found, omit the field from the response entirely (do not use null or empty values)

Example response format:
{
  "fieldName1": "value1",
  "fieldName2": true,
  "fieldName3": 42
}"#;
