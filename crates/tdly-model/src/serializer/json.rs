//! JSON document serializer

use super::DocumentSerializer;
use crate::document::Document;
use crate::error::SerializeError;

/// Pretty-printed JSON with a trailing newline
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentSerializer;

impl DocumentSerializer for JsonDocumentSerializer {
    fn name(&self) -> &str {
        "json"
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn serialize(&self, document: &Document) -> Result<String, SerializeError> {
        let mut content = serde_json::to_string_pretty(document)?;
        content.push('\n');
        Ok(content)
    }

    fn parse(&self, content: &str) -> Result<serde_json::Value, SerializeError> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TAGS: &str = r#"{
  "type": "Tags",
  "name": "labels",
  "properties": {},
  "items": [
    {
      "type": "Tag",
      "name": "urgent",
      "properties": {
        "aliases": [
          "asap",
          "now"
        ]
      }
    }
  ]
}
"#;

    #[test]
    fn round_trip_is_byte_exact() {
        let serializer = JsonDocumentSerializer;
        let doc = serializer.deserialize("Tags", &["Tag"], TAGS, "tags.json").unwrap();
        assert_eq!(doc.items[0].name, "urgent");
        assert_eq!(serializer.serialize(&doc).unwrap(), TAGS);
    }

    #[test]
    fn key_order_is_preserved() {
        let content = r#"{"name": "n", "type": "Tags", "items": [], "properties": {"z": 1, "a": 2}}"#;
        let doc = JsonDocumentSerializer
            .deserialize("Tags", &["Tag"], content, "t.json")
            .unwrap();
        let keys: Vec<_> = doc.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn malformed_json() {
        let err = JsonDocumentSerializer.parse("{").unwrap_err();
        assert!(matches!(err, SerializeError::Json(_)));
    }
}
