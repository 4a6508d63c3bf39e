use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A user-supplied photograph and its declared media type.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub data: Bytes,
    pub mime_type: String,
    /// Original file name, when the upload carried one. Only used for logging.
    pub file_name: Option<String>,
}

impl ImageInput {
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Unvalidated text returned by a vision provider for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawModelResponse(String);

impl RawModelResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RawModelResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RawModelResponse {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Structured description of one identified plant.
///
/// Field names are an open set; a missing key means "unknown". Keys produced
/// by the response interpreter are lower-cased, so `scientificName` in the
/// model output is stored as `scientificname`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantRecord {
    fields: BTreeMap<String, String>,
}

impl PlantRecord {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn scientific_name(&self) -> Option<&str> {
        self.get("scientificname")
    }

    pub fn family(&self) -> Option<&str> {
        self.get("family")
    }

    pub fn origin(&self) -> Option<&str> {
        self.get("origin")
    }

    pub fn uses(&self) -> Option<&str> {
        self.get("uses")
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as one `key: value` line per field.
    pub fn to_key_value_text(&self) -> String {
        let mut out = String::new();
        for (k, v) in &self.fields {
            out.push_str(k);
            out.push_str(": ");
            out.push_str(v);
            out.push('\n');
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PlantRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for PlantRecord {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_use_lowercase_keys() {
        let record: PlantRecord = [
            ("name", "Rose"),
            ("scientificname", "Rosa"),
            ("family", "Rosaceae"),
        ]
        .into_iter()
        .collect();
        assert_eq!(record.name(), Some("Rose"));
        assert_eq!(record.scientific_name(), Some("Rosa"));
        assert_eq!(record.family(), Some("Rosaceae"));
        assert_eq!(record.origin(), None);
    }

    #[test]
    fn serializes_as_flat_object() {
        let record: PlantRecord = [("name", "Fern")].into_iter().collect();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Fern" }));
    }

    #[test]
    fn key_value_text_one_line_per_field() {
        let record: PlantRecord = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(record.to_key_value_text(), "a: 1\nb: 2\n");
    }

    #[test]
    fn image_input_emptiness() {
        assert!(ImageInput::new(Vec::new(), "image/png").is_empty());
        let img = ImageInput::new(vec![1u8, 2, 3], "image/jpeg").with_file_name("leaf.jpg");
        assert_eq!(img.len(), 3);
        assert_eq!(img.file_name.as_deref(), Some("leaf.jpg"));
    }
}
