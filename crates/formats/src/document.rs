//! Network-model document as already-parsed field values.
//!
//! A document has four repeated-entity sections. Each entity is a flat map
//! of field name to raw text, plus an ordered vertex list for lines. Typing
//! and validation happen in the loader, not here.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub type Fields = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub fields: Fields,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vertices: Vec<Fields>,
}

impl EntityRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_vertex(mut self, x: impl ToString, y: impl ToString) -> Self {
        let mut vertex = Fields::new();
        vertex.insert("X".to_string(), x.to_string());
        vertex.insert("Y".to_string(), y.to_string());
        self.vertices.push(vertex);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDocument {
    #[serde(default)]
    pub substations: Vec<EntityRecord>,
    /// Plain junction nodes ("Nodes" in the markup).
    #[serde(default)]
    pub junctions: Vec<EntityRecord>,
    #[serde(default)]
    pub switches: Vec<EntityRecord>,
    #[serde(default)]
    pub lines: Vec<EntityRecord>,
}

#[derive(Debug)]
pub enum DocumentError {
    Io(std::io::Error),
    Xml(roxmltree::Error),
    Json(serde_json::Error),
    UnexpectedRoot { found: String },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Io(err) => write!(f, "I/O error: {err}"),
            DocumentError::Xml(err) => write!(f, "XML parse error: {err}"),
            DocumentError::Json(err) => write!(f, "JSON parse error: {err}"),
            DocumentError::UnexpectedRoot { found } => {
                write!(f, "expected <NetworkModel> root element, found <{found}>")
            }
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Io(err) => Some(err),
            DocumentError::Xml(err) => Some(err),
            DocumentError::Json(err) => Some(err),
            DocumentError::UnexpectedRoot { .. } => None,
        }
    }
}

impl NetworkDocument {
    pub fn from_json_str(payload: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(payload).map_err(DocumentError::Json)
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(DocumentError::Json)
    }

    /// Reads a document, choosing the front-end by extension (`.json` or markup).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(DocumentError::Io)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&payload)
        } else {
            Self::from_xml_str(&payload)
        }
    }

    pub fn entity_count(&self) -> usize {
        self.substations.len() + self.junctions.len() + self.switches.len() + self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityRecord, NetworkDocument};
    use pretty_assertions::assert_eq;

    #[test]
    fn json_round_trip_preserves_records() {
        let doc = NetworkDocument {
            substations: vec![
                EntityRecord::new()
                    .with("Id", 1)
                    .with("Name", "SS1")
                    .with("X", 406_000.5)
                    .with("Y", 5_012_000.0),
            ],
            lines: vec![
                EntityRecord::new()
                    .with("Id", 5)
                    .with_vertex(1.0, 2.0)
                    .with_vertex(3.0, 4.0),
            ],
            ..NetworkDocument::default()
        };
        let json = doc.to_json_string().expect("serialize");
        let back = NetworkDocument::from_json_str(&json).expect("parse");
        assert_eq!(back, doc);
        assert_eq!(back.entity_count(), 2);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let doc = NetworkDocument::from_json_str(r#"{"lines": []}"#).expect("parse");
        assert_eq!(doc, NetworkDocument::default());
    }

    #[test]
    fn builder_writes_vertex_fields() {
        let rec = EntityRecord::new().with_vertex("10.5", "20");
        assert_eq!(rec.vertices[0].get("X").map(String::as_str), Some("10.5"));
        assert_eq!(rec.field("Id"), None);
    }
}
