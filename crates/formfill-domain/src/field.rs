//! Field module - one named, typed slot in a schema

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Declared type of a field
///
/// The type decides which [`FieldValue`] variant the field may hold and how a raw
/// model answer is coerced into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free-form string
    Text,

    /// Numeric value
    Number,

    /// Boolean flag
    Checkbox,

    /// One of an enumerated set of strings
    Select,
}

impl FieldType {
    /// Get the type name as it appears in schema documents
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Checkbox => "checkbox",
            FieldType::Select => "select",
        }
    }

    /// Parse a type name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(FieldType::Text),
            "number" => Some(FieldType::Number),
            "checkbox" => Some(FieldType::Checkbox),
            "select" => Some(FieldType::Select),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed field value
///
/// Tagged union keyed by the field's declared type. Values only reach this type
/// through the response validator or [`crate::Schema::set_value`], so a form
/// layer holding a `FieldValue` never sees a wrongly-typed answer.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Value of a `text` field
    Text(String),

    /// Value of a `number` field (always finite)
    Number(f64),

    /// Value of a `checkbox` field
    Checkbox(bool),

    /// Value of a `select` field (a member of the field's options)
    Select(String),
}

/// Largest magnitude at which every integer is exactly representable as f64
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl FieldValue {
    /// The field type this value belongs to
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Number(_) => FieldType::Number,
            FieldValue::Checkbox(_) => FieldType::Checkbox,
            FieldValue::Select(_) => FieldType::Select,
        }
    }

    /// String payload of a text or select value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Select(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric payload of a number value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean payload of a checkbox value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Checkbox(b) => Some(*b),
            _ => None,
        }
    }

    /// Render the value as JSON
    ///
    /// Integral numbers are emitted without a fractional part.
    ///
    /// # Examples
    ///
    /// ```
    /// use formfill_domain::FieldValue;
    ///
    /// assert_eq!(FieldValue::Number(37.0).to_json(), serde_json::json!(37));
    /// assert_eq!(FieldValue::Number(2.5).to_json(), serde_json::json!(2.5));
    /// assert_eq!(FieldValue::Checkbox(true).to_json(), serde_json::json!(true));
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Text(s) | FieldValue::Select(s) => serde_json::Value::String(s.clone()),
            FieldValue::Checkbox(b) => serde_json::Value::Bool(*b),
            FieldValue::Number(n) => match integral(*n) {
                Some(i) => serde_json::Value::from(i),
                None => serde_json::Number::from_f64(*n)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null),
            },
        }
    }
}

fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
        Some(n as i64)
    } else {
        None
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) | FieldValue::Select(s) => f.write_str(s),
            FieldValue::Checkbox(b) => write!(f, "{}", b),
            FieldValue::Number(n) => match integral(*n) {
                Some(i) => write!(f, "{}", i),
                None => write!(f, "{}", n),
            },
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) | FieldValue::Select(s) => serializer.serialize_str(s),
            FieldValue::Checkbox(b) => serializer.serialize_bool(*b),
            FieldValue::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
        }
    }
}

/// A field definition with its current value
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Unique identifier, stable across a session
    pub name: String,

    /// Declared type
    pub field_type: FieldType,

    /// Display label (not used by extraction logic)
    pub label: String,

    /// Allowed values, in order; non-empty only for select fields
    pub options: Vec<String>,

    /// Current value; `None` renders as an empty input
    pub value: Option<FieldValue>,
}

impl Field {
    /// Create a field holding its type's default value
    pub fn new(name: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: label.into(),
            options: Vec::new(),
            value: Self::default_value(field_type),
        }
    }

    /// Create a select field with its allowed options
    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut field = Self::new(name, FieldType::Select, label);
        field.options = options.into_iter().map(Into::into).collect();
        field
    }

    /// Default value for a field type
    ///
    /// Text starts as an empty string and checkbox as `false`; number and select
    /// start absent since an empty string is not a valid member of either.
    pub fn default_value(field_type: FieldType) -> Option<FieldValue> {
        match field_type {
            FieldType::Text => Some(FieldValue::Text(String::new())),
            FieldType::Checkbox => Some(FieldValue::Checkbox(false)),
            FieldType::Number | FieldType::Select => None,
        }
    }

    /// Whether `value` satisfies this field's type contract
    pub fn accepts(&self, value: &FieldValue) -> bool {
        if value.field_type() != self.field_type {
            return false;
        }
        match value {
            FieldValue::Select(choice) => self.options.iter().any(|o| o == choice),
            FieldValue::Number(n) => n.is_finite(),
            _ => true,
        }
    }

    /// Current value rendered for display (empty when absent)
    pub fn display_value(&self) -> String {
        self.value
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}
