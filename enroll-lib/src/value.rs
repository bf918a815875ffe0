//! Field values and form snapshots.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// The value of one form field.
///
/// Most fields carry text. Agreement-style checkboxes carry a flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl FieldValue {
    /// The text rules are evaluated against.
    ///
    /// Text is trimmed. A set flag reads as `"on"` and an unset flag as the
    /// empty string, so `required` on a checkbox means "must be checked".
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(text) => text.trim(),
            Self::Flag(true) => "on",
            Self::Flag(false) => "",
        }
    }

    /// The text exactly as entered, without trimming.
    pub fn raw_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Flag(_) => self.as_text(),
        }
    }

    /// Returns `true` if the value is empty after trimming.
    pub fn is_empty(&self) -> bool {
        self.as_text().is_empty()
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

/// An ordered snapshot of every field value, handed to the submit transport.
///
/// Fields appear in declaration order. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, FieldValue)>,
}

impl FormData {
    pub(crate) fn new(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    /// Get the value of a field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Get the trimmed text of a field, or `""` when absent.
    pub fn text(&self, name: &str) -> &str {
        self.get(name).map(FieldValue::as_text).unwrap_or("")
    }

    /// Iterate over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for FormData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
