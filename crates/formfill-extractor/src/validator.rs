//! Validate and coerce a raw model answer against a schema
//!
//! The validator is the only place where an untyped JSON value becomes a
//! [`FieldValue`]. Wrong-type or wrong-choice answers are treated as "no answer"
//! for that field; only a response that cannot be parsed at all fails the call.

use crate::config::NewlineHandling;
use crate::error::ProcessingError;
use formfill_domain::{ExtractionResult, Field, FieldType, FieldValue, Schema};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, warn};

/// Why an extracted value was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The model answered `null`
    Null,
    /// Number field whose value has no numeric reading
    NotNumeric,
    /// Checkbox field whose value is neither a boolean nor a string
    NotBoolean,
    /// Select field whose value is not one of its options
    NotAnOption,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::Null => "null value",
            Rejection::NotNumeric => "not a number",
            Rejection::NotBoolean => "not a boolean",
            Rejection::NotAnOption => "not one of the allowed options",
        };
        f.write_str(reason)
    }
}

/// A field present in the answer whose value was dropped
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRejection {
    /// Field name
    pub field: String,
    /// Reason the value was dropped
    pub reason: Rejection,
    /// The value as the model sent it
    pub raw_value: Value,
}

/// Outcome of validating one answer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Accepted values in schema order
    pub result: ExtractionResult,
    /// Fields the model answered but whose values were dropped
    pub rejected: Vec<FieldRejection>,
}

/// Validate a raw model answer with the default newline handling
///
/// # Examples
///
/// ```
/// use formfill_domain::{Field, FieldType, FieldValue, Schema};
/// use formfill_extractor::validate_response;
///
/// let schema = Schema::new(vec![Field::new("age", FieldType::Number, "Age")]).unwrap();
/// let result = validate_response(r#"{"age": "37"}"#, &schema).unwrap();
/// assert_eq!(result.get("age"), Some(&FieldValue::Number(37.0)));
///
/// assert!(validate_response("not json", &schema).is_err());
/// ```
pub fn validate_response(raw: &str, schema: &Schema) -> Result<ExtractionResult, ProcessingError> {
    validate_response_with(raw, schema, NewlineHandling::default()).map(|report| report.result)
}

/// Validate a raw model answer, reporting dropped fields
///
/// Fails with [`ProcessingError::ResponseFormat`] when the answer is not a JSON
/// object; in that case no field is trusted and no partial result is returned.
pub fn validate_response_with(
    raw: &str,
    schema: &Schema,
    handling: NewlineHandling,
) -> Result<ValidationReport, ProcessingError> {
    let object = match handling {
        NewlineHandling::Strip => parse_object(&normalize(raw, true)),
        NewlineHandling::ParseFirst => parse_object(&normalize(raw, false)).or_else(|e| {
            debug!("Answer did not parse as-is ({}), retrying without newline escapes", e);
            parse_object(&normalize(raw, true))
        }),
    }
    .inspect_err(|_| {
        warn!(response_chars = raw.len(), "Completion is not a valid JSON object");
    })?;

    Ok(validate_object(&object, schema))
}

/// Re-run coercion over an existing result
///
/// A result produced by this module comes back unchanged.
pub fn revalidate(result: &ExtractionResult, schema: &Schema) -> ExtractionResult {
    let object: Map<String, Value> = result
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_json()))
        .collect();
    validate_object(&object, schema).result
}

/// Coerce a single raw value into a field's declared type
pub fn coerce(field: &Field, value: &Value) -> Result<FieldValue, Rejection> {
    if value.is_null() {
        return Err(Rejection::Null);
    }

    match field.field_type {
        FieldType::Number => coerce_number(value)
            .map(FieldValue::Number)
            .ok_or(Rejection::NotNumeric),
        FieldType::Checkbox => match value {
            Value::Bool(b) => Ok(FieldValue::Checkbox(*b)),
            Value::String(s) => Ok(FieldValue::Checkbox(s.to_lowercase() == "true")),
            _ => Err(Rejection::NotBoolean),
        },
        FieldType::Select => match value {
            Value::String(s) if field.options.contains(s) => Ok(FieldValue::Select(s.clone())),
            _ => Err(Rejection::NotAnOption),
        },
        FieldType::Text => Ok(FieldValue::Text(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })),
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn validate_object(object: &Map<String, Value>, schema: &Schema) -> ValidationReport {
    let mut report = ValidationReport::default();

    for field in schema {
        let Some(value) = object.get(&field.name) else {
            continue;
        };

        match coerce(field, value) {
            Ok(coerced) => report.result.insert(field.name.clone(), coerced),
            Err(reason) => {
                warn!(field = %field.name, %reason, "Dropping extracted value");
                report.rejected.push(FieldRejection {
                    field: field.name.clone(),
                    reason,
                    raw_value: value.clone(),
                });
            }
        }
    }

    debug!(
        accepted = report.result.len(),
        rejected = report.rejected.len(),
        "Validated response"
    );
    report
}

/// Prepare raw model output for parsing
///
/// Trims surrounding whitespace and a surrounding Markdown code fence. With
/// `strip_newline_escapes`, every literal `\n` escape sequence is removed first.
pub fn normalize(raw: &str, strip_newline_escapes: bool) -> String {
    let text = if strip_newline_escapes {
        raw.replace("\\n", "")
    } else {
        raw.to_string()
    };
    strip_code_fence(text.trim()).to_string()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Skip the language tag, if any
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest.trim_start_matches("json"),
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn parse_object(text: &str) -> Result<Map<String, Value>, ProcessingError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ProcessingError::ResponseFormat(format!("Invalid JSON in API response: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ProcessingError::ResponseFormat(
            "Expected a JSON object in API response".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number_schema() -> Schema {
        Schema::new(vec![Field::new("age", FieldType::Number, "Age")]).unwrap()
    }

    fn mixed_schema() -> Schema {
        Schema::new(vec![
            Field::new("name", FieldType::Text, "Name"),
            Field::new("age", FieldType::Number, "Age"),
            Field::new("active", FieldType::Checkbox, "Active"),
            Field::select("status", "Status", ["open", "closed"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_string_to_number() {
        let result = validate_response(r#"{"age":"37"}"#, &number_schema()).unwrap();
        assert_eq!(result.get("age"), Some(&FieldValue::Number(37.0)));
        assert_eq!(result.to_json(), json!({"age": 37}));
    }

    #[test]
    fn test_non_numeric_dropped() {
        let result = validate_response(r#"{"age":"abc"}"#, &number_schema()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_number_variants() {
        let field = Field::new("n", FieldType::Number, "N");
        assert_eq!(coerce(&field, &json!(12.5)), Ok(FieldValue::Number(12.5)));
        assert_eq!(coerce(&field, &json!(" 42 ")), Ok(FieldValue::Number(42.0)));
        assert_eq!(coerce(&field, &json!("1e3")), Ok(FieldValue::Number(1000.0)));
        assert_eq!(coerce(&field, &json!("-0.25")), Ok(FieldValue::Number(-0.25)));
        assert_eq!(coerce(&field, &json!("")), Err(Rejection::NotNumeric));
        assert_eq!(coerce(&field, &json!("NaN")), Err(Rejection::NotNumeric));
        assert_eq!(coerce(&field, &json!("Infinity")), Err(Rejection::NotNumeric));
        assert_eq!(coerce(&field, &json!("$1,200")), Err(Rejection::NotNumeric));
        assert_eq!(coerce(&field, &json!(true)), Err(Rejection::NotNumeric));
        assert_eq!(coerce(&field, &json!([1])), Err(Rejection::NotNumeric));
        assert_eq!(coerce(&field, &Value::Null), Err(Rejection::Null));
    }

    #[test]
    fn test_checkbox_coercion() {
        let schema = Schema::new(vec![Field::new("active", FieldType::Checkbox, "Active")]).unwrap();
        let result = validate_response(r#"{"active":"TRUE"}"#, &schema).unwrap();
        assert_eq!(result.get("active"), Some(&FieldValue::Checkbox(true)));

        let field = &schema.fields()[0];
        assert_eq!(coerce(field, &json!(false)), Ok(FieldValue::Checkbox(false)));
        assert_eq!(coerce(field, &json!("yes")), Ok(FieldValue::Checkbox(false)));
        assert_eq!(coerce(field, &json!("True")), Ok(FieldValue::Checkbox(true)));
        assert_eq!(coerce(field, &json!(1)), Err(Rejection::NotBoolean));
        assert_eq!(coerce(field, &json!({"v": true})), Err(Rejection::NotBoolean));
    }

    #[test]
    fn test_select_requires_exact_option() {
        let schema = Schema::new(vec![Field::select("status", "Status", ["open", "closed"])]).unwrap();
        let result = validate_response(r#"{"status":"pending"}"#, &schema).unwrap();
        assert!(result.is_empty());

        let field = &schema.fields()[0];
        assert_eq!(coerce(field, &json!("closed")), Ok(FieldValue::Select("closed".into())));
        assert_eq!(coerce(field, &json!("Closed")), Err(Rejection::NotAnOption));
        assert_eq!(coerce(field, &json!(1)), Err(Rejection::NotAnOption));
    }

    #[test]
    fn test_text_coercion() {
        let field = Field::new("t", FieldType::Text, "T");
        assert_eq!(coerce(&field, &json!("hello")), Ok(FieldValue::Text("hello".into())));
        assert_eq!(coerce(&field, &json!(42)), Ok(FieldValue::Text("42".into())));
        assert_eq!(coerce(&field, &json!(3.5)), Ok(FieldValue::Text("3.5".into())));
        assert_eq!(coerce(&field, &json!(true)), Ok(FieldValue::Text("true".into())));
        assert_eq!(coerce(&field, &json!(["a", 1])), Ok(FieldValue::Text(r#"["a",1]"#.into())));
        assert_eq!(coerce(&field, &json!("")), Ok(FieldValue::Text(String::new())));
        assert_eq!(coerce(&field, &Value::Null), Err(Rejection::Null));
    }

    #[test]
    fn test_absent_fields_not_present() {
        let result = validate_response(r#"{"name": "Ada"}"#, &mixed_schema()).unwrap();
        assert_eq!(result.field_names(), vec!["name"]);
        assert!(result.get("age").is_none());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let result = validate_response(r#"{"name": "Ada", "extra": 1}"#, &mixed_schema()).unwrap();
        assert_eq!(result.len(), 1);
        assert!(!result.contains("extra"));
    }

    #[test]
    fn test_result_follows_schema_order() {
        let raw = r#"{"status": "open", "active": true, "age": 3, "name": "Ada"}"#;
        let result = validate_response(raw, &mixed_schema()).unwrap();
        assert_eq!(result.field_names(), vec!["name", "age", "active", "status"]);
    }

    #[test]
    fn test_invalid_json_fails_whole_call() {
        let err = validate_response("not json", &mixed_schema()).unwrap_err();
        assert!(matches!(err, ProcessingError::ResponseFormat(_)));
        assert!(err.to_string().contains("Invalid JSON in API response"));
    }

    #[test]
    fn test_non_object_json_fails() {
        for raw in [r#"["a"]"#, "42", r#""text""#, "null"] {
            let err = validate_response(raw, &mixed_schema()).unwrap_err();
            assert!(matches!(err, ProcessingError::ResponseFormat(_)), "{}", raw);
        }
    }

    #[test]
    fn test_report_lists_rejections() {
        let raw = r#"{"name": null, "age": "old", "active": "true", "status": "archived"}"#;
        let report = validate_response_with(raw, &mixed_schema(), NewlineHandling::Strip).unwrap();

        assert_eq!(report.result.field_names(), vec!["active"]);
        let rejected: Vec<_> = report
            .rejected
            .iter()
            .map(|r| (r.field.as_str(), r.reason))
            .collect();
        assert_eq!(
            rejected,
            vec![
                ("name", Rejection::Null),
                ("age", Rejection::NotNumeric),
                ("status", Rejection::NotAnOption),
            ]
        );
        assert_eq!(report.rejected[1].raw_value, json!("old"));
    }

    #[test]
    fn test_double_escaped_newlines_are_stripped() {
        let raw = r#"{\n  "name": "Ada",\n  "age": 36\n}"#;
        let result = validate_response(raw, &mixed_schema()).unwrap();
        assert_eq!(result.get("name"), Some(&FieldValue::Text("Ada".into())));
        assert_eq!(result.get("age"), Some(&FieldValue::Number(36.0)));
    }

    #[test]
    fn test_strip_removes_embedded_newlines() {
        let raw = r#"{"name": "line one\nline two"}"#;
        let result = validate_response(raw, &mixed_schema()).unwrap();
        assert_eq!(result.get("name"), Some(&FieldValue::Text("line oneline two".into())));
    }

    #[test]
    fn test_parse_first_preserves_embedded_newlines() {
        let raw = r#"{"name": "line one\nline two"}"#;
        let report = validate_response_with(raw, &mixed_schema(), NewlineHandling::ParseFirst).unwrap();
        assert_eq!(
            report.result.get("name"),
            Some(&FieldValue::Text("line one\nline two".into()))
        );
    }

    #[test]
    fn test_parse_first_falls_back_to_strip() {
        let raw = r#"{\n"age": 36\n}"#;
        let report = validate_response_with(raw, &mixed_schema(), NewlineHandling::ParseFirst).unwrap();
        assert_eq!(report.result.get("age"), Some(&FieldValue::Number(36.0)));
    }

    #[test]
    fn test_code_fence_is_removed() {
        let raw = "```json\n{\"age\": 5}\n```";
        let result = validate_response(raw, &number_schema()).unwrap();
        assert_eq!(result.get("age"), Some(&FieldValue::Number(5.0)));

        let raw = "```\n{\"age\": 6}\n```";
        let result = validate_response(raw, &number_schema()).unwrap();
        assert_eq!(result.get("age"), Some(&FieldValue::Number(6.0)));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  {\"a\": 1}\n ", true), "{\"a\": 1}");
        assert_eq!(normalize(r#"{"a": "x\ny"}"#, true), r#"{"a": "xy"}"#);
        assert_eq!(normalize(r#"{"a": "x\ny"}"#, false), r#"{"a": "x\ny"}"#);
        assert_eq!(normalize("```json{\"a\": 1}```", false), "{\"a\": 1}");
    }

    #[test]
    fn test_revalidate_is_identity_on_validated_result() {
        let raw = r#"{"name": 42, "age": "7.5", "active": "TRUE", "status": "closed"}"#;
        let schema = mixed_schema();
        let result = validate_response(raw, &schema).unwrap();
        assert_eq!(revalidate(&result, &schema), result);
    }
}
