//! Schema module - the ordered set of fields to extract

use crate::field::{Field, FieldType, FieldValue};
use crate::result::ExtractionResult;
use serde::Deserialize;
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when a schema violates its invariants
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Input is not well-formed JSON or a field entry is malformed
    #[error("Invalid schema JSON: {0}")]
    InvalidJson(String),

    /// Top-level `fields` array is missing
    #[error("Invalid JSON format: missing fields array")]
    MissingFields,

    /// Schema declares no fields
    #[error("Schema has no fields")]
    Empty,

    /// A field has an empty name
    #[error("Field at position {0} has an empty name")]
    EmptyName(usize),

    /// Two fields share a name
    #[error("Duplicate field name '{0}'")]
    DuplicateName(String),

    /// A select field has no options
    #[error("Select field '{0}' must declare at least one option")]
    MissingOptions(String),

    /// A select field lists the same option twice
    #[error("Select field '{field}' lists option '{option}' more than once")]
    DuplicateOption {
        /// Field name
        field: String,
        /// Repeated option
        option: String,
    },

    /// A non-select field declares options
    #[error("Field '{0}' declares options but is not a select field")]
    UnexpectedOptions(String),

    /// No field with the given name
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// Value does not satisfy the field's type contract
    #[error("Value for field '{field}' does not satisfy its {expected} type")]
    InvalidValue {
        /// Field name
        field: String,
        /// Declared type of the field
        expected: FieldType,
    },
}

/// Field entry as it appears in an uploaded schema document
#[derive(Debug, Deserialize)]
struct FieldDefinition {
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    label: String,
    #[serde(default)]
    options: Option<Vec<String>>,
}

impl From<FieldDefinition> for Field {
    fn from(def: FieldDefinition) -> Self {
        let mut field = Field::new(def.name, def.field_type, def.label);
        field.options = def.options.unwrap_or_default();
        field
    }
}

/// An ordered sequence of fields keyed by unique name
///
/// A `Schema` is created once from user input and afterwards only changes by
/// having field values replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Create a schema, checking every invariant
    ///
    /// # Examples
    ///
    /// ```
    /// use formfill_domain::{Field, FieldType, Schema};
    ///
    /// let schema = Schema::new(vec![
    ///     Field::new("name", FieldType::Text, "Full name"),
    ///     Field::select("status", "Status", ["open", "closed"]),
    /// ]).unwrap();
    /// assert_eq!(schema.len(), 2);
    ///
    /// assert!(Schema::new(vec![Field::select("status", "Status", Vec::<String>::new())]).is_err());
    /// ```
    pub fn new(fields: Vec<Field>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::new();
        for (idx, field) in fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyName(idx));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateName(field.name.clone()));
            }
            check_options(field)?;
        }

        Ok(Self { fields })
    }

    /// Parse a schema document of the form `{"fields": [{name, type, label, options?}]}`
    ///
    /// Any `value` present in the document is ignored; every field starts at its
    /// type's default.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let document: serde_json::Value =
            serde_json::from_str(json).map_err(|e| SchemaError::InvalidJson(e.to_string()))?;

        let entries = document
            .get("fields")
            .filter(|f| f.is_array())
            .cloned()
            .ok_or(SchemaError::MissingFields)?;

        let definitions: Vec<FieldDefinition> = serde_json::from_value(entries)
            .map_err(|e| SchemaError::InvalidJson(e.to_string()))?;

        Self::new(definitions.into_iter().map(Field::from).collect())
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Iterate over fields in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a constructed schema
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Merge an extraction result into the field values
    ///
    /// Fields absent from `result` keep their current value. Returns the number of
    /// fields that were updated.
    pub fn apply(&mut self, result: &ExtractionResult) -> usize {
        let mut updated = 0;
        for field in &mut self.fields {
            if let Some(value) = result.get(&field.name) {
                if field.accepts(value) {
                    field.value = Some(value.clone());
                    updated += 1;
                }
            }
        }
        updated
    }

    /// Set a single field's value, enforcing its type contract
    pub fn set_value(&mut self, name: &str, value: FieldValue) -> Result<(), SchemaError> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;

        if !field.accepts(&value) {
            return Err(SchemaError::InvalidValue {
                field: field.name.clone(),
                expected: field.field_type,
            });
        }

        field.value = Some(value);
        Ok(())
    }

    /// Restore every field to its type's default value
    pub fn reset_values(&mut self) {
        for field in &mut self.fields {
            field.value = Field::default_value(field.field_type);
        }
    }

    /// Render the schema, including current values, as a schema document
    ///
    /// Absent values are written as empty strings, matching what a form shows.
    pub fn to_json(&self) -> serde_json::Value {
        let fields: Vec<serde_json::Value> = self
            .fields
            .iter()
            .map(|f| {
                let mut entry = serde_json::json!({
                    "name": f.name,
                    "type": f.field_type,
                    "label": f.label,
                    "value": f.value.as_ref().map(FieldValue::to_json).unwrap_or_else(|| "".into()),
                });
                if f.field_type == FieldType::Select {
                    entry["options"] = serde_json::json!(f.options);
                }
                entry
            })
            .collect();

        serde_json::json!({ "fields": fields })
    }
}

fn check_options(field: &Field) -> Result<(), SchemaError> {
    if field.field_type != FieldType::Select {
        if !field.options.is_empty() {
            return Err(SchemaError::UnexpectedOptions(field.name.clone()));
        }
        return Ok(());
    }

    if field.options.is_empty() {
        return Err(SchemaError::MissingOptions(field.name.clone()));
    }

    let mut seen = HashSet::new();
    for option in &field.options {
        if !seen.insert(option.as_str()) {
            return Err(SchemaError::DuplicateOption {
                field: field.name.clone(),
                option: option.clone(),
            });
        }
    }
    Ok(())
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVOICE_SCHEMA: &str = r#"{
        "fields": [
            {"name": "vendor", "type": "text", "label": "Vendor"},
            {"name": "total", "type": "number", "label": "Total"},
            {"name": "paid", "type": "checkbox", "label": "Paid"},
            {"name": "currency", "type": "select", "label": "Currency", "options": ["USD", "EUR"]}
        ]
    }"#;

    #[test]
    fn test_parse_schema() {
        let schema = Schema::from_json(INVOICE_SCHEMA).unwrap();
        assert_eq!(schema.len(), 4);
        let names: Vec<_> = schema.names().collect();
        assert_eq!(names, vec!["vendor", "total", "paid", "currency"]);
        assert_eq!(schema.get("currency").unwrap().options, vec!["USD", "EUR"]);
    }

    #[test]
    fn test_parse_ignores_incoming_values() {
        let json = r#"{"fields": [
            {"name": "paid", "type": "checkbox", "label": "Paid", "value": true},
            {"name": "vendor", "type": "text", "label": "Vendor", "value": "ACME"}
        ]}"#;
        let schema = Schema::from_json(json).unwrap();
        assert_eq!(schema.get("paid").unwrap().value, Some(FieldValue::Checkbox(false)));
        assert_eq!(schema.get("vendor").unwrap().value, Some(FieldValue::Text(String::new())));
    }

    #[test]
    fn test_missing_fields_array() {
        assert_eq!(Schema::from_json(r#"{"items": []}"#), Err(SchemaError::MissingFields));
        assert_eq!(Schema::from_json(r#"{"fields": {}}"#), Err(SchemaError::MissingFields));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Schema::from_json("{fields"), Err(SchemaError::InvalidJson(_))));
    }

    #[test]
    fn test_unknown_field_type() {
        let json = r#"{"fields": [{"name": "when", "type": "date", "label": "When"}]}"#;
        assert!(matches!(Schema::from_json(json), Err(SchemaError::InvalidJson(_))));
    }

    #[test]
    fn test_empty_schema() {
        assert_eq!(Schema::from_json(r#"{"fields": []}"#), Err(SchemaError::Empty));
    }

    #[test]
    fn test_duplicate_names() {
        let result = Schema::new(vec![
            Field::new("a", FieldType::Text, "A"),
            Field::new("a", FieldType::Number, "A again"),
        ]);
        assert_eq!(result, Err(SchemaError::DuplicateName("a".into())));
    }

    #[test]
    fn test_empty_name() {
        let result = Schema::new(vec![
            Field::new("a", FieldType::Text, "A"),
            Field::new(" ", FieldType::Text, "Blank"),
        ]);
        assert_eq!(result, Err(SchemaError::EmptyName(1)));
    }

    #[test]
    fn test_select_requires_options() {
        let json = r#"{"fields": [{"name": "s", "type": "select", "label": "S"}]}"#;
        assert_eq!(Schema::from_json(json), Err(SchemaError::MissingOptions("s".into())));
    }

    #[test]
    fn test_select_duplicate_option() {
        let result = Schema::new(vec![Field::select("s", "S", ["a", "b", "a"])]);
        assert!(matches!(result, Err(SchemaError::DuplicateOption { .. })));
    }

    #[test]
    fn test_options_on_non_select() {
        let json = r#"{"fields": [{"name": "t", "type": "text", "label": "T", "options": ["x"]}]}"#;
        assert_eq!(Schema::from_json(json), Err(SchemaError::UnexpectedOptions("t".into())));

        // An empty list is tolerated
        let json = r#"{"fields": [{"name": "t", "type": "text", "label": "T", "options": []}]}"#;
        assert!(Schema::from_json(json).is_ok());
    }

    #[test]
    fn test_apply_preserves_absent_fields() {
        let mut schema = Schema::from_json(INVOICE_SCHEMA).unwrap();
        schema.set_value("vendor", FieldValue::Text("Old Vendor".into())).unwrap();

        let mut result = ExtractionResult::new();
        result.insert("total", FieldValue::Number(12.5));
        result.insert("paid", FieldValue::Checkbox(true));

        assert_eq!(schema.apply(&result), 2);
        assert_eq!(schema.get("vendor").unwrap().value, Some(FieldValue::Text("Old Vendor".into())));
        assert_eq!(schema.get("total").unwrap().value, Some(FieldValue::Number(12.5)));
        assert_eq!(schema.get("paid").unwrap().value, Some(FieldValue::Checkbox(true)));
        assert_eq!(schema.get("currency").unwrap().value, None);
    }

    #[test]
    fn test_apply_skips_wrong_types() {
        let mut schema = Schema::from_json(INVOICE_SCHEMA).unwrap();
        let mut result = ExtractionResult::new();
        result.insert("total", FieldValue::Text("twelve".into()));
        result.insert("currency", FieldValue::Select("GBP".into()));
        result.insert("unknown", FieldValue::Checkbox(true));

        assert_eq!(schema.apply(&result), 0);
        assert_eq!(schema.get("total").unwrap().value, None);
    }

    #[test]
    fn test_set_value_enforces_contract() {
        let mut schema = Schema::from_json(INVOICE_SCHEMA).unwrap();
        assert!(schema.set_value("currency", FieldValue::Select("EUR".into())).is_ok());
        assert!(matches!(
            schema.set_value("currency", FieldValue::Select("GBP".into())),
            Err(SchemaError::InvalidValue { .. })
        ));
        assert!(matches!(
            schema.set_value("paid", FieldValue::Text("yes".into())),
            Err(SchemaError::InvalidValue { .. })
        ));
        assert_eq!(
            schema.set_value("missing", FieldValue::Checkbox(true)),
            Err(SchemaError::UnknownField("missing".into()))
        );
    }

    #[test]
    fn test_reset_values() {
        let mut schema = Schema::from_json(INVOICE_SCHEMA).unwrap();
        schema.set_value("paid", FieldValue::Checkbox(true)).unwrap();
        schema.set_value("total", FieldValue::Number(3.0)).unwrap();
        schema.reset_values();
        assert_eq!(schema.get("paid").unwrap().value, Some(FieldValue::Checkbox(false)));
        assert_eq!(schema.get("total").unwrap().value, None);
    }

    #[test]
    fn test_to_json_includes_values() {
        let mut schema = Schema::from_json(INVOICE_SCHEMA).unwrap();
        schema.set_value("total", FieldValue::Number(99.0)).unwrap();
        let json = schema.to_json();

        let fields = json["fields"].as_array().unwrap();
        assert_eq!(fields[1]["value"], serde_json::json!(99));
        assert_eq!(fields[2]["value"], serde_json::json!(false));
        assert_eq!(fields[3]["value"], serde_json::json!(""));
        assert_eq!(fields[3]["options"], serde_json::json!(["USD", "EUR"]));
        assert!(fields[0].get("options").is_none());

        // The rendered document parses back into the same field definitions
        let reparsed = Schema::from_json(&json.to_string()).unwrap();
        assert_eq!(reparsed.names().collect::<Vec<_>>(), schema.names().collect::<Vec<_>>());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("a", FieldType::Text, "A"),
            Field::new("b", FieldType::Number, "B"),
            Field::new("c", FieldType::Checkbox, "C"),
            Field::select("d", "D", ["x", "y"]),
        ])
        .unwrap()
    }

    proptest! {
        /// Property: applying a result only touches fields named in it
        #[test]
        fn test_apply_preserves_absent_fields(text in ".*", include_text in any::<bool>(), n in -1e9f64..1e9) {
            let mut result = ExtractionResult::new();
            if include_text {
                result.insert("a", FieldValue::Text(text.clone()));
            }
            result.insert("b", FieldValue::Number(n));

            let mut schema = schema();
            schema.set_value("a", FieldValue::Text("before".into())).unwrap();
            schema.apply(&result);

            let expected_a = if include_text { text } else { "before".to_string() };
            prop_assert_eq!(&schema.get("a").unwrap().value, &Some(FieldValue::Text(expected_a)));
            prop_assert_eq!(&schema.get("b").unwrap().value, &Some(FieldValue::Number(n)));
            prop_assert_eq!(&schema.get("c").unwrap().value, &Some(FieldValue::Checkbox(false)));
            prop_assert_eq!(&schema.get("d").unwrap().value, &None);
        }

        /// Property: select fields never hold a value outside their options
        #[test]
        fn test_apply_never_stores_unknown_option(choice in "[a-z]{1,3}") {
            let mut schema = schema();
            let result: ExtractionResult = [("d", FieldValue::Select(choice.clone()))].into_iter().collect();
            schema.apply(&result);

            let stored = schema.get("d").unwrap().value.clone();
            if choice == "x" || choice == "y" {
                prop_assert_eq!(stored, Some(FieldValue::Select(choice)));
            } else {
                prop_assert_eq!(stored, None);
            }
        }
    }
}
