//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use formfill_domain::{ModelInfo, Schema};
use formfill_extractor::Extraction;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an extraction against the schema it was run for.
    pub fn format_extraction(&self, extraction: &Extraction, schema: &Schema) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "values": extraction.values.to_json(),
                "metadata": extraction.metadata,
            }))?),
            OutputFormat::Table => Ok(self.format_extraction_table(extraction, schema)),
            OutputFormat::Quiet => Ok(extraction.values.to_json().to_string()),
        }
    }

    /// Format extraction values as a table, one row per schema field.
    fn format_extraction_table(&self, extraction: &Extraction, schema: &Schema) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Type", "Value"]);

        for field in schema {
            let value = match extraction.values.get(&field.name) {
                Some(value) => value.to_string(),
                None if extraction.metadata.rejected.contains(&field.name) => {
                    self.colorize("(rejected)", "red")
                }
                None => self.colorize("(not found)", "yellow"),
            };
            builder.push_record([field.name.clone(), field.field_type.to_string(), value]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!(
            "{}\n{}",
            table,
            self.info(&format!(
                "{} of {} fields extracted with {} in {} ms",
                extraction.metadata.fields_extracted,
                extraction.metadata.fields_requested,
                extraction.metadata.model,
                extraction.metadata.processing_time_ms
            ))
        )
    }

    /// Format a model listing.
    pub fn format_models(&self, models: &[&ModelInfo]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(models)?),
            OutputFormat::Quiet => Ok(models
                .iter()
                .map(|m| m.id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if models.is_empty() {
                    return Ok(self.colorize("No models found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Name", "Prompt", "Completion"]);
                for model in models {
                    builder.push_record([
                        model.id.as_str(),
                        model.name.as_str(),
                        model.pricing.prompt.as_str(),
                        model.pricing.completion.as_str(),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a schema's fields.
    pub fn format_schema(&self, schema: &Schema) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&schema.to_json())?),
            OutputFormat::Quiet => Ok(schema.names().collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Name", "Type", "Label", "Options"]);
                for field in schema {
                    builder.push_record([
                        field.name.clone(),
                        field.field_type.to_string(),
                        field.label.clone(),
                        field.options.join(", "),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formfill_domain::{ExtractionResult, Field, FieldType, FieldValue};
    use formfill_extractor::ExtractionMetadata;

    fn metadata(extracted: usize, rejected: &[&str]) -> ExtractionMetadata {
        ExtractionMetadata {
            request_id: Default::default(),
            model: "openai/gpt-4o-mini".to_string(),
            fields_requested: 3,
            fields_extracted: extracted,
            rejected: rejected.iter().map(|s| s.to_string()).collect(),
            processing_time_ms: 12,
        }
    }

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("customer", FieldType::Text, "Customer"),
            Field::new("total", FieldType::Number, "Total"),
            Field::select("currency", "Currency", ["USD", "EUR"]),
        ])
        .unwrap()
    }

    fn extraction() -> Extraction {
        let values: ExtractionResult = [
            ("customer", FieldValue::Text("Jane Doe".into())),
            ("total", FieldValue::Number(1200.0)),
        ]
        .into_iter()
        .collect();
        Extraction {
            values,
            metadata: metadata(2, &["currency"]),
        }
    }

    #[test]
    fn test_extraction_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_extraction(&extraction(), &schema()).unwrap();
        assert!(output.contains("Jane Doe"));
        assert!(output.contains("1200"));
        assert!(output.contains("(rejected)"));
        assert!(output.contains("2 of 3 fields extracted"));
    }

    #[test]
    fn test_extraction_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_extraction(&extraction(), &schema()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["values"]["customer"], "Jane Doe");
        assert_eq!(parsed["values"]["total"], 1200);
        assert_eq!(parsed["metadata"]["rejected"][0], "currency");
    }

    #[test]
    fn test_extraction_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_extraction(&extraction(), &schema()).unwrap();
        assert_eq!(output, r#"{"customer":"Jane Doe","total":1200}"#);
    }

    #[test]
    fn test_models_output() {
        let models = vec![
            ModelInfo::new("openai/gpt-4o-mini", "GPT-4o mini"),
            ModelInfo::new("local/llama", "local/llama"),
        ];
        let refs: Vec<&ModelInfo> = models.iter().collect();

        let quiet = Formatter::new(OutputFormat::Quiet, false).format_models(&refs).unwrap();
        assert_eq!(quiet, "openai/gpt-4o-mini\nlocal/llama");

        let table = Formatter::new(OutputFormat::Table, false).format_models(&refs).unwrap();
        assert!(table.contains("GPT-4o mini"));
        assert!(table.contains("N/A"));

        let empty = Formatter::new(OutputFormat::Table, false).format_models(&[]).unwrap();
        assert_eq!(empty, "No models found.");
    }

    #[test]
    fn test_schema_output() {
        let table = Formatter::new(OutputFormat::Table, false).format_schema(&schema()).unwrap();
        assert!(table.contains("USD, EUR"));

        let quiet = Formatter::new(OutputFormat::Quiet, false).format_schema(&schema()).unwrap();
        assert_eq!(quiet, "customer\ntotal\ncurrency");
    }

    #[test]
    fn test_messages_without_color() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
