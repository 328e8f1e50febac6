//! YAML document serializer
//!
//! Uses serde_yaml for both directions. Output is serde_yaml's canonical
//! block style, so files written by this serializer round-trip byte for byte.

use super::DocumentSerializer;
use crate::document::Document;
use crate::error::SerializeError;

/// YAML serializer (the default on-disk format)
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDocumentSerializer;

impl DocumentSerializer for YamlDocumentSerializer {
    fn name(&self) -> &str {
        "yaml"
    }

    fn extension(&self) -> &str {
        "yml"
    }

    fn serialize(&self, document: &Document) -> Result<String, SerializeError> {
        Ok(serde_yaml::to_string(document)?)
    }

    fn parse(&self, content: &str) -> Result<serde_json::Value, SerializeError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentItem;
    use crate::error::DocumentError;
    use pretty_assertions::assert_eq;
    use tdly_typed::{PropertyValue, TypeTagError};

    const SHOPPING: &str = "\
type: List
name: shopping
properties: {}
items:
- type: Item
  name: milk
  properties:
    guid: c0ffee00-0000-4000-8000-000000000001
    content: two litres
";

    #[test]
    fn deserializes_generic_document() {
        let doc = YamlDocumentSerializer
            .deserialize("List", &["Item"], SHOPPING, "lists/shopping.yml")
            .unwrap();
        assert_eq!(doc.doc_type, "List");
        assert_eq!(doc.relative_path, "lists/shopping.yml");
        assert_eq!(doc.items[0].name, "milk");
        assert_eq!(
            doc.items[0].properties.get("content"),
            Some(&PropertyValue::from("two litres"))
        );
    }

    #[test]
    fn round_trip_is_byte_exact() {
        let serializer = YamlDocumentSerializer;
        let doc = serializer
            .deserialize("List", &["Item"], SHOPPING, "lists/shopping.yml")
            .unwrap();
        assert_eq!(serializer.serialize(&doc).unwrap(), SHOPPING);
    }

    #[test]
    fn unknown_keys_survive_round_trip() {
        let content = "\
type: List
name: chores
created: last week
properties: {}
items:
- type: Item
  name: sweep
  done: true
  properties:
    guid: g-1
    content: kitchen floor
";
        let serializer = YamlDocumentSerializer;
        let doc = serializer.deserialize("List", &["Item"], content, "chores.yml").unwrap();
        assert_eq!(doc.layout.extra.get("created"), Some(&PropertyValue::from("last week")));
        assert_eq!(doc.items[0].layout.extra.get("done"), Some(&PropertyValue::Bool(true)));
        assert_eq!(serializer.serialize(&doc).unwrap(), content);
    }

    #[test]
    fn stored_key_order_is_kept() {
        let serializer = YamlDocumentSerializer;
        for content in [
            "name: n\ntype: List\nitems: []\nproperties: {}\n",
            "items: []\nname: n\ntype: List\n",
        ] {
            let doc = serializer.deserialize("List", &["Item"], content, "n.yml").unwrap();
            assert_eq!(serializer.serialize(&doc).unwrap(), content);
        }
    }

    #[test]
    fn edits_land_after_stored_keys() {
        let serializer = YamlDocumentSerializer;
        let doc = serializer
            .deserialize("List", &["Item"], "items: []\nname: n\ntype: List\n", "n.yml")
            .unwrap()
            .with_property("note", "hi")
            .with_extra("pinned", true);
        assert_eq!(
            serializer.serialize(&doc).unwrap(),
            "items: []\nname: n\ntype: List\nproperties:\n  note: hi\npinned: true\n"
        );
    }

    #[test]
    fn hash_ignores_relative_path() {
        let serializer = YamlDocumentSerializer;
        let a = serializer.deserialize("List", &["Item"], SHOPPING, "a.yml").unwrap();
        let b = serializer.deserialize("List", &["Item"], SHOPPING, "b/c.yml").unwrap();
        assert_eq!(
            serializer.compute_hash(&a).unwrap(),
            serializer.compute_hash(&b).unwrap()
        );
        assert_eq!(
            serializer.compute_hash(&a).unwrap(),
            serializer.compute_content_hash(SHOPPING)
        );
    }

    #[test]
    fn has_changed() {
        let serializer = YamlDocumentSerializer;
        let doc = serializer.deserialize("List", &["Item"], SHOPPING, "a.yml").unwrap();
        let hash = serializer.compute_hash(&doc).unwrap();

        assert!(!serializer.has_changed(&doc, Some(&hash)).unwrap());
        assert!(serializer.has_changed(&doc, None).unwrap());

        let edited = doc.with_item(DocumentItem::new("Item", "eggs"));
        assert!(serializer.has_changed(&edited, Some(&hash)).unwrap());
    }

    #[test]
    fn null_properties_are_dropped_on_write() {
        let content = "type: List\nname: n\nproperties:\n  note: null\nitems: []\n";
        let serializer = YamlDocumentSerializer;
        let doc = serializer.deserialize("List", &["Item"], content, "n.yml").unwrap();
        assert!(doc.properties["note"].is_absent());
        assert_eq!(
            serializer.serialize(&doc).unwrap(),
            "type: List\nname: n\nproperties: {}\nitems: []\n"
        );
    }

    #[test]
    fn rejects_non_mapping_content() {
        let err = YamlDocumentSerializer
            .deserialize_to_object("- just\n- a list\n", "x.yml")
            .unwrap_err();
        assert!(matches!(err, SerializeError::NotAMapping { .. }));
    }

    #[test]
    fn structural_errors_surface() {
        let content = "type: List\nname: n\nitems:\n- type: Tag\n  name: t\n";
        let err = YamlDocumentSerializer
            .deserialize("List", &["Item"], content, "n.yml")
            .unwrap_err();
        match err {
            SerializeError::Document(doc_err) => assert!(matches!(
                doc_err.root_cause(),
                DocumentError::TypeTag(TypeTagError::WrongTypeTag { .. })
            )),
            other => panic!("expected document error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_yaml() {
        let err = YamlDocumentSerializer.parse("type: [unclosed").unwrap_err();
        assert!(matches!(err, SerializeError::Yaml(_)));
    }
}
