//! Extraction result - partial mapping of field name to validated value

use crate::field::FieldValue;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Validated values keyed by field name
///
/// Entries keep the order in which they were inserted, which for results built
/// by the response validator is schema order. Fields without a discoverable
/// value are simply absent; there are no null or placeholder entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResult {
    entries: Vec<(String, FieldValue)>,
}

impl ExtractionResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any existing value for the same name
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Value for a field, if one was extracted
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Whether a value was extracted for a field
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of extracted fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Names of extracted fields in insertion order
    pub fn field_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Render as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(n, v)| (n.clone(), v.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<N: Into<String>> FromIterator<(N, FieldValue)> for ExtractionResult {
    fn from_iter<I: IntoIterator<Item = (N, FieldValue)>>(iter: I) -> Self {
        let mut result = Self::new();
        for (name, value) in iter {
            result.insert(name, value);
        }
        result
    }
}
